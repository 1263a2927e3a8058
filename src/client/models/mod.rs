//! Product store data models

mod product;

pub use product::{
    DESCRIPTION_MAX_LEN, NAME_MAX_LEN, Product, ProductDraft, ProductForm, ProductPatch,
};
