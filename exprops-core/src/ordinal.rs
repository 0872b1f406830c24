//! Explicit chain positions for resolvers and converters.

use crate::context::InvocationContext;
use crate::converter::{ConversionContext, ConversionResult, Converter};
use crate::error::Result;
use crate::resolver::Resolver;
use crate::types::TargetType;
use std::sync::Arc;

/// Attaches an ordinal to a resolver or converter.
pub struct Ordered<T> {
    ordinal: i32,
    inner: T,
}

/// Give `inner` an explicit ordinal. Lower sorts earlier.
pub fn ordered<T>(ordinal: i32, inner: T) -> Ordered<T> {
    Ordered { ordinal, inner }
}

impl<T> Ordered<T> {
    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<R: Resolver> Resolver for Ordered<R> {
    fn resolve(&self, ctx: &InvocationContext<'_>, name: &str) -> Result<Option<String>> {
        self.inner.resolve(ctx, name)
    }

    fn ordinal(&self) -> Option<i32> {
        Some(self.ordinal)
    }

    fn members(&self) -> Option<&[Arc<dyn Resolver>]> {
        self.inner.members()
    }
}

impl<C: Converter> Converter for Ordered<C> {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        self.inner.can_convert_to(target)
    }

    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &TargetType,
    ) -> Result<ConversionResult> {
        self.inner.convert(ctx, value, target)
    }

    fn ordinal(&self) -> Option<i32> {
        Some(self.ordinal)
    }
}

/// Stable ascending sort; items without an ordinal keep their relative order
/// and land after all ordered ones, `i32::MAX` included.
pub fn sort_by_ordinal<T>(items: &mut [T], ordinal: impl Fn(&T) -> Option<i32>) {
    items.sort_by_key(|item| {
        let ordinal = ordinal(item);
        (ordinal.is_none(), ordinal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_stable_for_unordered() {
        let mut items = vec![("a", None), ("b", Some(2)), ("c", None), ("d", Some(1))];
        sort_by_ordinal(&mut items, |(_, ordinal)| *ordinal);
        let names: Vec<_> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_max_ordinal_still_sorts_before_unordered() {
        let mut items = vec![("a", None), ("b", Some(i32::MAX)), ("c", Some(i32::MIN))];
        sort_by_ordinal(&mut items, |(_, ordinal)| *ordinal);
        let names: Vec<_> = items.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
