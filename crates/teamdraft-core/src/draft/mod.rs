// Draft engine: quotas, validation, snake rotation, undo.

pub mod engine;
pub mod quota;
pub mod state;
pub mod undo;
pub mod validate;
