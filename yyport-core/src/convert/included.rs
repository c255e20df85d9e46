//! Included files
//!
//! Included files have no descriptor; the file itself sits at the path the
//! manifest lists.

use anyhow::Result;

use super::Converter;
use crate::source::BlobRef;
use crate::types::{resource_path, Identity, SourceKind, TargetKind};

impl<'a> Converter<'a> {
    pub(crate) fn convert_included_files(&mut self) {
        self.run_phase(
            TargetKind::IncludedFile,
            SourceKind::IncludedFile,
            Self::convert_included_file,
        );
    }

    fn convert_included_file(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let name = &identity.name;
        let bytes = self
            .source
            .raw_bytes(&BlobRef::IncludedFile(index))
            .unwrap_or_else(|| {
                tracing::warn!("Included file {} has no data, writing it empty", name);
                Vec::new()
            });

        self.output
            .write_bytes(&resource_path(TargetKind::IncludedFile, name), &bytes)?;
        self.register(TargetKind::IncludedFile, identity);
        Ok(())
    }
}
