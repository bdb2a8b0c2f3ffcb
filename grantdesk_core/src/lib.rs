pub mod api_models;
pub mod ids;
pub mod permission_tree;
