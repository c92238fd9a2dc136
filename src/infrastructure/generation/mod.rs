//! Built-in response generators

mod template;

pub use template::TemplateResponseGenerator;
