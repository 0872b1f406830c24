//! Post-resolution transformations selected by `#[process(...)]` tags.

mod base64_decode;
mod decrypt;
mod root;

use crate::context::InvocationContext;
use crate::error::Result;
use crate::method::ProcessorTag;

pub use base64_decode::{Base64DecodeProcessor, Base64Encoding};
pub use decrypt::{DecryptProcessor, Decryptor};
pub use root::RootProcessor;

/// Transforms a resolved value before conversion.
///
/// A processor runs only for methods carrying a tag with its
/// [`name`](Processor::name).
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, ctx: &ProcessingContext<'_>, value: &str) -> Result<String>;
}

impl<P: Processor + ?Sized> Processor for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(&self, ctx: &ProcessingContext<'_>, value: &str) -> Result<String> {
        (**self).process(ctx, value)
    }
}

/// The invocation plus the tag that selected the processor.
#[derive(Clone, Copy)]
pub struct ProcessingContext<'a> {
    invocation: InvocationContext<'a>,
    tag: &'a ProcessorTag,
}

impl<'a> ProcessingContext<'a> {
    pub fn new(invocation: &InvocationContext<'a>, tag: &'a ProcessorTag) -> Self {
        ProcessingContext {
            invocation: *invocation,
            tag,
        }
    }

    pub fn invocation(&self) -> &InvocationContext<'a> {
        &self.invocation
    }

    pub fn tag(&self) -> &'a ProcessorTag {
        self.tag
    }

    /// `"aes"` in `#[process(decrypt = "aes")]`.
    pub fn argument(&self) -> Option<&'a str> {
        self.tag.argument
    }
}
