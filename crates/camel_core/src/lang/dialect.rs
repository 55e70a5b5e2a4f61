//! Per-file dialect configuration.
//!
//! A [`Dialect`] enumerates which optional grammar extensions are active. It is resolved once per file by the caller
//! and handed to the lexer and parser; it never changes mid-parse.
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::dialect::{Dialect, ObjectSystem, TryCatchDialect};
//!
//! let dialect = Dialect::new()
//!     .with_signatures(true)
//!     .with_try_catch(TryCatchDialect::Native)
//!     .with_object_system(ObjectSystem::Moose);
//! assert!(dialect.signatures);
//! assert!(dialect.allows(camel_core::lang::dialect::Feature::Moose));
//! ```

/// Which `try`/`catch` flavor is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TryCatchDialect {
    /// `try`/`catch` are plain identifiers.
    #[default]
    None,
    /// `use feature 'try'`: `try {} catch ($e) {} finally {}`.
    Native,
    /// `Try::Tiny` style: `try {} catch {} finally {};`.
    TryTiny,
}

/// Which object-system sugar is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectSystem {
    #[default]
    None,
    /// `has`, `extends`, `with`, method modifiers, `super`, `inner`.
    Moose,
}

/// A single optional grammar extension, used to gate keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Signatures,
    TryCatch,
    AsyncAwait,
    Moose,
}

/// Grammar extensions active for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dialect {
    /// Subroutine signatures plus the `method` / `func` keywords.
    pub signatures: bool,
    pub try_catch: TryCatchDialect,
    /// `async sub` and `await`.
    pub async_await: bool,
    pub object_system: ObjectSystem,
    /// The file is an embedded-template document: text outside `<? ... ?>` is markup.
    pub template: bool,
}

impl Dialect {
    /// Plain Perl 5 without extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signatures, native try/catch and async/await.
    pub fn modern() -> Self {
        Self::new()
            .with_signatures(true)
            .with_try_catch(TryCatchDialect::Native)
            .with_async_await(true)
    }

    /// Embedded-template document.
    pub fn template() -> Self {
        Self::new().with_template(true)
    }

    pub fn with_signatures(mut self, enabled: bool) -> Self {
        self.signatures = enabled;
        self
    }

    pub fn with_try_catch(mut self, flavor: TryCatchDialect) -> Self {
        self.try_catch = flavor;
        self
    }

    pub fn with_async_await(mut self, enabled: bool) -> Self {
        self.async_await = enabled;
        self
    }

    pub fn with_object_system(mut self, system: ObjectSystem) -> Self {
        self.object_system = system;
        self
    }

    pub fn with_template(mut self, enabled: bool) -> Self {
        self.template = enabled;
        self
    }

    /// Return `true` if `feature` is enabled.
    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Signatures => self.signatures,
            Feature::TryCatch => self.try_catch != TryCatchDialect::None,
            Feature::AsyncAwait => self.async_await,
            Feature::Moose => self.object_system == ObjectSystem::Moose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain_perl() {
        let dialect = Dialect::default();
        assert!(!dialect.signatures);
        assert_eq!(dialect.try_catch, TryCatchDialect::None);
        assert!(!dialect.async_await);
        assert_eq!(dialect.object_system, ObjectSystem::None);
        assert!(!dialect.template);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(Dialect::new(), Dialect::default());
    }

    #[test]
    fn test_modern_preset() {
        let dialect = Dialect::modern();
        assert!(dialect.allows(Feature::Signatures));
        assert!(dialect.allows(Feature::TryCatch));
        assert!(dialect.allows(Feature::AsyncAwait));
        assert!(!dialect.allows(Feature::Moose));
    }

    #[test]
    fn test_builder_chain() {
        let dialect = Dialect::template().with_try_catch(TryCatchDialect::TryTiny);
        assert!(dialect.template);
        assert!(dialect.allows(Feature::TryCatch));
    }
}
