//! Scripts

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::source::CodeOwner;
use crate::types::{resource_dir, Identity, ResourceHeader, SourceKind, TargetKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptDocument {
    is_dn_d: bool,
    is_compatibility: bool,
    #[serde(flatten)]
    header: ResourceHeader,
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_scripts(&mut self) {
        self.run_phase(TargetKind::Script, SourceKind::Script, Self::convert_script);
    }

    fn convert_script(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let name = &identity.name;
        let rel = join_relative([
            resource_dir(TargetKind::Script, name).as_str(),
            format!("{}.gml", name).as_str(),
        ]);
        self.emit_code(CodeOwner::Script(index), &rel)?;

        let document = ScriptDocument {
            is_dn_d: false,
            is_compatibility: false,
            header: ResourceHeader::new(TargetKind::Script, name),
        };
        self.write_descriptor(TargetKind::Script, name, &document)?;
        self.register(TargetKind::Script, identity);
        Ok(())
    }
}
