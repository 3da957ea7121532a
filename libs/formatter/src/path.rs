//! The routed resource path consumed by payload-kind selection.
//!
//! Routing itself is a host concern: by the time this layer runs, the
//! request URL has already been matched and broken into segments. The path
//! carries just enough structure to pick a payload kind and to identify
//! the navigation property a relationship payload is relative to.

use std::fmt;

use edm::{Model, NavigationProperty};

/// One segment of a routed request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A top-level addressable collection, `People`.
    EntitySet(String),

    /// A key literal addressing one member, `(7)`.
    Key(String),

    /// A navigation property traversal, `Order`.
    Navigation(String),

    /// A structural property access, `HomeAddress`.
    Property(String),

    /// The relationship address space, `$links`.
    Links,

    /// The bare value of the addressed property, `$value`.
    RawValue,
}

/// An ordered segment chain, `People(7)/$links/Order` style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourcePath {
    segments: Vec<PathSegment>,
}

impl ResourcePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn terminal(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The entity set the path starts at, if it starts at one.
    pub fn entity_set(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::EntitySet(name)) => Some(name),
            _ => None,
        }
    }

    /// The name of the terminal property segment, if the path addresses a
    /// property. Used to name single-property payloads.
    pub fn property_name(&self) -> Option<&str> {
        match self.terminal() {
            Some(PathSegment::Property(name)) => Some(name),
            _ => None,
        }
    }

    /// Whether the path addresses a relationship (`$links` followed by a
    /// navigation segment).
    pub fn is_links_navigation(&self) -> bool {
        let n = self.segments.len();
        n >= 2
            && matches!(self.segments[n - 2], PathSegment::Links)
            && matches!(self.segments[n - 1], PathSegment::Navigation(_))
    }

    /// Resolve the navigation property a `$links` path is relative to.
    ///
    /// Walks the path against the model: entity set to its element type,
    /// through any intermediate navigations, to the navigation segment
    /// following `$links`. Any unresolvable step yields `None`; callers
    /// decide whether that is fatal.
    pub fn links_navigation<'m>(&self, model: &'m Model) -> Option<&'m NavigationProperty> {
        let mut segments = self.segments.iter();
        let set_name = match segments.next()? {
            PathSegment::EntitySet(name) => name,
            _ => return None,
        };
        let set = model.entity_set(set_name)?;
        let mut current = model.entity_type(&set.entity_type)?;

        for segment in segments.by_ref() {
            match segment {
                PathSegment::Key(_) => {}
                PathSegment::Navigation(name) => {
                    let nav = current.navigation_property(name)?;
                    current = model.entity_type(&nav.target)?;
                }
                PathSegment::Links => {
                    return match segments.next()? {
                        PathSegment::Navigation(name) => current.navigation_property(name),
                        _ => None,
                    };
                }
                _ => return None,
            }
        }
        None
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, "({key})")?,
                other => {
                    if !first {
                        f.write_str("/")?;
                    }
                    match other {
                        PathSegment::EntitySet(name)
                        | PathSegment::Navigation(name)
                        | PathSegment::Property(name) => f.write_str(name)?,
                        PathSegment::Links => f.write_str("$links")?,
                        PathSegment::RawValue => f.write_str("$value")?,
                        PathSegment::Key(_) => unreachable!(),
                    }
                }
            }
            first = false;
        }
        Ok(())
    }
}
