// Core modules implementing keypath splitting, navigation, and error modeling.
pub mod error;
pub mod keypath;
pub mod kind;
pub mod navigate;
