// 工具模块

pub mod anon_var_generator;
pub mod id_gen;
pub mod logging;
pub mod object_pool;

pub use anon_var_generator::AnonVarGenerator;
pub use id_gen::{EPIdGenerator, IdGenerator};
pub use object_pool::{Arena, ExprRef, Handle, NodeRef, ObjectPool};
