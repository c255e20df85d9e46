//! Reference resolution
//!
//! Turns source cross-references into [`ResourceRef`]s. A target that has not
//! been converted yet gets its identity allocated on the spot, so a resolved
//! reference never points at a name the registry does not know.

use uuid::Uuid;

use crate::registry::Registry;
use crate::source::SourceGraph;
use crate::types::{resource_key, Identity, ResourceRef, SourceHandle, SourceKind, TargetKind};

/// Prefix of tilesets derived from backgrounds
pub const TILESET_PREFIX: &str = "ts_";

/// Raw (pre-sanitize) name a source resource takes in a target kind
pub fn derived_raw_name(
    graph: &SourceGraph,
    target: TargetKind,
    handle: SourceHandle,
) -> Option<String> {
    let raw = graph.usable_name(handle)?;
    let name = match (target, handle.kind) {
        (TargetKind::TileSet, SourceKind::Background) => format!("{TILESET_PREFIX}{raw}"),
        _ => raw.to_string(),
    };
    Some(name)
}

impl Registry {
    /// Identity of a source resource in `target`, allocating it if needed.
    ///
    /// Returns `None` if the resource does not exist or has no usable name.
    /// Included files keep a file name rather than an identifier.
    pub fn identity_for(
        &mut self,
        graph: &SourceGraph,
        target: TargetKind,
        handle: SourceHandle,
    ) -> Option<Identity> {
        let name = match self.assigned_name(target, handle) {
            Some(name) => name.to_string(),
            None => {
                let raw = derived_raw_name(graph, target, handle)?;
                match target {
                    TargetKind::IncludedFile => self.assign_file(target, handle, &raw),
                    _ => self.assign(target, handle, &raw),
                }
            }
        };
        Some(self.identity(target, &name))
    }

    /// Resolve an optional source reference into a reference descriptor
    pub fn resolve(
        &mut self,
        graph: &SourceGraph,
        source: Option<SourceHandle>,
        target: TargetKind,
    ) -> Option<ResourceRef> {
        let handle = source?;
        match self.identity_for(graph, target, handle) {
            Some(identity) => Some(self.issue(target, &identity)),
            None => {
                tracing::warn!(
                    "Unresolvable reference to {} (as {}), leaving it empty",
                    handle,
                    target
                );
                None
            }
        }
    }

    /// Resolve a source index of `kind` into `target`
    pub fn resolve_index(
        &mut self,
        graph: &SourceGraph,
        kind: SourceKind,
        index: Option<usize>,
        target: TargetKind,
    ) -> Option<ResourceRef> {
        self.resolve(graph, index.map(|i| SourceHandle::new(kind, i)), target)
    }

    /// Resolve a name/id pair the caller already holds
    pub fn resolve_by_name(
        &mut self,
        name: &str,
        id: Uuid,
        target: TargetKind,
    ) -> Option<ResourceRef> {
        if id.is_nil() || name.is_empty() {
            return None;
        }

        let Some(known) = self.bind_id(target, name, id) else {
            tracing::warn!(
                "Reference to {} collides with a name already in use, leaving it empty",
                resource_key(target, name)
            );
            return None;
        };
        if known != id {
            tracing::warn!(
                "Reference to {} carries id {} but the registry holds {}",
                resource_key(target, name),
                id,
                known
            );
            return None;
        }

        let identity = Identity {
            name: name.to_string(),
            id,
        };
        Some(self.issue(target, &identity))
    }

    /// Resolve a group reference, falling back to the default group of `target`
    pub fn resolve_group(
        &mut self,
        graph: &SourceGraph,
        kind: SourceKind,
        index: Option<usize>,
        target: TargetKind,
    ) -> Option<ResourceRef> {
        if let Some(reference) = self.resolve_index(graph, kind, index, target) {
            return Some(reference);
        }
        let default = self.default_group(target)?;
        self.resolve_by_name(&default.name, default.id, target)
    }

    fn issue(&mut self, target: TargetKind, identity: &Identity) -> ResourceRef {
        self.record_issued(target, identity);
        ResourceRef::new(target, identity)
    }
}
