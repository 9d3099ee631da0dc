use crate::domain::ports::NameGenerator;

pub fn fallback_name(index: usize) -> String {
    format!("Group {}", index + 1)
}

pub fn fallback_names(count: usize) -> Vec<String> {
    (0..count).map(fallback_name).collect()
}

/// Asks the generator for `count` names and always returns exactly `count`.
///
/// A failed call yields the full fallback list. Missing or blank entries are
/// backfilled with `fallback_name` for their slot; surplus entries are dropped.
pub async fn resolve_group_names<G: NameGenerator + ?Sized>(
    generator: &G,
    count: usize,
) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let generated = match generator.generate_names(count).await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!("⚠️ Name generation failed, using default group names: {}", e);
            return fallback_names(count);
        }
    };

    if generated.len() < count {
        tracing::debug!(
            "Name generator returned {} of {} names, backfilling",
            generated.len(),
            count
        );
    }

    let mut generated = generated.into_iter();
    (0..count)
        .map(|i| match generated.next() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => fallback_name(i),
        })
        .collect()
}
