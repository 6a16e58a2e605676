pub mod dot;
pub mod exec;
pub mod r#gen;
