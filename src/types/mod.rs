pub mod gemini;
pub mod tools;
