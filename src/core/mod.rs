pub mod controller;
pub mod display_context;
pub mod frame;
pub mod gpu_context;
pub mod input_adapter;
pub mod listeners;
