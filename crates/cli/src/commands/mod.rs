pub(crate) mod check;
pub(crate) mod list;
pub(crate) mod tree;
