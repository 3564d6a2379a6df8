//! Request handlers, one module per feature.

pub mod item;

pub use item::{
    CreateItemCommand, CreateItemHandler, DeleteItemCommand, DeleteItemHandler, GetItemHandler,
    GetItemQuery, ItemView, UpdateItemCommand, UpdateItemHandler,
};
