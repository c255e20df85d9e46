//! Identity registry
//!
//! Run-scoped state handing out final names and opaque ids. A name, once
//! assigned, is never reassigned; an id, once generated for a resource key, is
//! returned for every later lookup of that key.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::path_utils::sanitize_filename;
use crate::sanitize::sanitize;
use crate::types::{
    resource_key, Identity, SourceHandle, TargetKind, DEFAULT_AUDIO_GROUP, DEFAULT_TEXTURE_GROUP,
};

/// A reference handed out by the resolver, kept for the closure check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRef {
    pub kind: TargetKind,
    pub identity: Identity,
}

#[derive(Debug)]
pub struct Registry {
    /// Resource key -> opaque id
    ids: HashMap<String, Uuid>,
    /// Lower-cased final names across every kind
    taken: HashSet<String>,
    /// Next disambiguation suffix per (kind, lower-cased base name)
    counters: HashMap<(TargetKind, String), u32>,
    /// Final name of each source resource per target kind
    assigned: HashMap<(TargetKind, SourceHandle), String>,
    /// Default groups already claimed by a source group of the same name
    claimed_defaults: HashSet<TargetKind>,
    issued: Vec<IssuedRef>,
    issued_ids: HashSet<Uuid>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry with the two default groups reserved
    pub fn new() -> Self {
        let mut registry = Self {
            ids: HashMap::new(),
            taken: HashSet::new(),
            counters: HashMap::new(),
            assigned: HashMap::new(),
            claimed_defaults: HashSet::new(),
            issued: Vec::new(),
            issued_ids: HashSet::new(),
        };

        for (kind, name) in [
            (TargetKind::AudioGroup, DEFAULT_AUDIO_GROUP),
            (TargetKind::TextureGroup, DEFAULT_TEXTURE_GROUP),
        ] {
            registry.taken.insert(name.to_ascii_lowercase());
            registry.get_or_create_id(&resource_key(kind, name));
        }

        registry
    }

    /// Memoized id for a resource key; generated on first call
    pub fn get_or_create_id(&mut self, key: &str) -> Uuid {
        *self
            .ids
            .entry(key.to_string())
            .or_insert_with(Uuid::new_v4)
    }

    /// Bind `id` to a final name unless its key already has one; returns the
    /// bound id. A newly bound name is reserved like any assigned name.
    ///
    /// Returns `None` if the name is new to `kind` but already taken under
    /// another case or by another kind.
    pub(crate) fn bind_id(&mut self, kind: TargetKind, name: &str, id: Uuid) -> Option<Uuid> {
        let key = resource_key(kind, name);
        if let Some(existing) = self.ids.get(&key) {
            return Some(*existing);
        }
        if !self.taken.insert(name.to_ascii_lowercase()) {
            return None;
        }
        self.ids.insert(key, id);
        Some(id)
    }

    /// Sanitize `raw` and disambiguate it against every name assigned so far.
    ///
    /// Collisions are case-insensitive and span all kinds; the `_N` counter
    /// is tracked per (kind, base name).
    pub fn unique_name(&mut self, kind: TargetKind, raw: &str) -> String {
        let base = sanitize(raw);
        self.disambiguate(kind, base, |base, n| format!("{}_{}", base, n))
    }

    /// Like [`Registry::unique_name`] for names that must stay valid file
    /// names: dots survive and the counter goes before the extension.
    pub fn unique_file_name(&mut self, kind: TargetKind, raw: &str) -> String {
        let base = sanitize_filename(raw);
        self.disambiguate(kind, base, |base, n| match base.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
            _ => format!("{}_{}", base, n),
        })
    }

    fn disambiguate<F>(&mut self, kind: TargetKind, base: String, candidate: F) -> String
    where
        F: Fn(&str, u32) -> String,
    {
        let lower = base.to_ascii_lowercase();
        if self.taken.insert(lower.clone()) {
            return base;
        }

        let counter = self.counters.entry((kind, lower)).or_insert(0);
        loop {
            *counter += 1;
            let name = candidate(&base, *counter);
            if self.taken.insert(name.to_ascii_lowercase()) {
                return name;
            }
        }
    }

    /// Final name previously assigned to a source resource
    pub fn assigned_name(&self, kind: TargetKind, handle: SourceHandle) -> Option<&str> {
        self.assigned.get(&(kind, handle)).map(String::as_str)
    }

    /// Assign (or return the already assigned) final name of a source resource.
    ///
    /// The first source group whose sanitized name matches a default group
    /// becomes that default group instead of a colliding duplicate.
    pub fn assign(&mut self, kind: TargetKind, handle: SourceHandle, raw: &str) -> String {
        if let Some(name) = self.assigned.get(&(kind, handle)) {
            return name.clone();
        }

        let name = match kind.default_group() {
            Some(default)
                if sanitize(raw).eq_ignore_ascii_case(&sanitize(default))
                    && self.claimed_defaults.insert(kind) =>
            {
                default.to_string()
            }
            _ => self.unique_name(kind, raw),
        };

        self.assigned.insert((kind, handle), name.clone());
        name
    }

    /// Assign the final file name of a source resource, see [`Registry::unique_file_name`]
    pub fn assign_file(&mut self, kind: TargetKind, handle: SourceHandle, raw: &str) -> String {
        if let Some(name) = self.assigned.get(&(kind, handle)) {
            return name.clone();
        }
        let name = self.unique_file_name(kind, raw);
        self.assigned.insert((kind, handle), name.clone());
        name
    }

    /// Identity record of a final name
    pub fn identity(&mut self, kind: TargetKind, name: &str) -> Identity {
        Identity {
            name: name.to_string(),
            id: self.get_or_create_id(&resource_key(kind, name)),
        }
    }

    /// Identity of a default group
    pub fn default_group(&mut self, kind: TargetKind) -> Option<Identity> {
        let name = kind.default_group()?;
        Some(self.identity(kind, name))
    }

    /// Record a reference handed out to a converter
    pub(crate) fn record_issued(&mut self, kind: TargetKind, identity: &Identity) {
        if self.issued_ids.insert(identity.id) {
            self.issued.push(IssuedRef {
                kind,
                identity: identity.clone(),
            });
        }
    }

    /// Every reference produced during the run, in first-issued order
    pub fn issued(&self) -> &[IssuedRef] {
        &self.issued
    }

    /// Returns true if `name` is taken in any kind (case-insensitive)
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_ascii_lowercase())
    }
}
