pub mod info_model;
pub mod summary_model;
