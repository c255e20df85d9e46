//! Timelines

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::source::CodeOwner;
use crate::types::{resource_dir, Identity, ResourceHeader, SourceKind, TargetKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineDocument {
    moment_list: Vec<Moment>,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Moment {
    moment: u32,
    evnt: MomentEvent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MomentEvent {
    event_num: u32,
    event_type: u32,
    is_dn_d: bool,
    resource_type: &'static str,
}

/// Code file of the moment at `step`
pub fn moment_file(step: u32) -> String {
    format!("moment_{}.gml", step)
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_timelines(&mut self) {
        self.run_phase(TargetKind::Timeline, SourceKind::Timeline, Self::convert_timeline);
    }

    fn convert_timeline(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let timeline = &self.graph().timelines[index];
        let name = &identity.name;
        let dir = resource_dir(TargetKind::Timeline, name);

        let mut seen = HashSet::new();
        let mut moment_list = Vec::with_capacity(timeline.moments.len());
        for &step in &timeline.moments {
            if !seen.insert(step) {
                tracing::warn!("Timeline {} has a duplicate moment at step {}, skipping it", name, step);
                continue;
            }
            let rel = join_relative([dir.as_str(), moment_file(step).as_str()]);
            self.emit_code(
                CodeOwner::TimelineMoment {
                    timeline: index,
                    step,
                },
                &rel,
            )?;
            moment_list.push(Moment {
                moment: step,
                evnt: MomentEvent {
                    event_num: step,
                    event_type: 0,
                    is_dn_d: false,
                    resource_type: "GMEvent",
                },
            });
        }

        let document = TimelineDocument {
            moment_list,
            header: ResourceHeader::new(TargetKind::Timeline, name),
        };
        self.write_descriptor(TargetKind::Timeline, name, &document)?;
        self.register(TargetKind::Timeline, identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_file() {
        assert_eq!(moment_file(0), "moment_0.gml");
        assert_eq!(moment_file(120), "moment_120.gml");
    }
}
