use crate::core::naming::resolve_group_names;
use crate::core::shuffle::shuffled;
use crate::domain::model::{new_id, Group, Participant};
use crate::domain::ports::NameGenerator;
use crate::utils::error::{Result, ToolboxError};
use rand::Rng;

pub const MIN_GROUPING_PARTICIPANTS: usize = 2;

/// Number of groups needed for `total` participants at `group_size` each.
pub fn group_count(total: usize, group_size: usize) -> usize {
    if group_size == 0 {
        return 0;
    }
    total.div_ceil(group_size)
}

/// Contiguous chunks of `group_size`; only the last may be short.
pub fn partition(participants: Vec<Participant>, group_size: usize) -> Vec<Vec<Participant>> {
    if group_size == 0 {
        return Vec::new();
    }
    participants
        .chunks(group_size)
        .map(|chunk| chunk.to_vec())
        .collect()
}

pub struct GroupingEngine<G: NameGenerator> {
    generator: G,
}

impl<G: NameGenerator> GroupingEngine<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Shuffles the roster once and slices it into named groups.
    ///
    /// `group_size` is capped at the roster length. Name generation failures
    /// never surface here; see `resolve_group_names`.
    pub async fn form_groups<R: Rng + Send + ?Sized>(
        &self,
        roster: &[Participant],
        group_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Group>> {
        if roster.len() < MIN_GROUPING_PARTICIPANTS {
            return Err(ToolboxError::InsufficientParticipants {
                required: MIN_GROUPING_PARTICIPANTS,
                actual: roster.len(),
            });
        }
        if group_size == 0 {
            return Err(ToolboxError::InvalidGroupSize { size: group_size });
        }

        let size = group_size.min(roster.len());
        let chunks = partition(shuffled(roster, rng), size);
        tracing::debug!(
            "Partitioned {} participants into {} groups of up to {}",
            roster.len(),
            chunks.len(),
            size
        );

        let names = resolve_group_names(&self.generator, chunks.len()).await;

        let groups: Vec<Group> = chunks
            .into_iter()
            .zip(names)
            .map(|(members, name)| Group {
                id: new_id(),
                name,
                members,
            })
            .collect();

        tracing::info!("👥 Formed {} groups", groups.len());
        Ok(groups)
    }
}
