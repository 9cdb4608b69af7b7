pub mod language;
pub mod openai;
pub mod summarizer;
pub mod summary;
pub mod transcript;
pub mod video;
pub mod youtube;

pub use language::*;
pub use openai::*;
pub use summarizer::*;
pub use summary::*;
pub use transcript::*;
pub use video::*;
pub use youtube::*;
