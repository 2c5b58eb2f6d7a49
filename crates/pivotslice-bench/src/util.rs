use pivotslice_core::{Citation, GraphData, Publication};
use std::fs;
use tempfile::TempDir;

/// Deterministic citation graph: years spread over two decades, a few dozen
/// authors, and every paper citing up to `fan_out` older ones.
pub fn synthetic_graph(publication_count: usize, fan_out: usize) -> GraphData {
    let count = publication_count as i64;
    let publications = (0..count)
        .map(|i| {
            let mut publication = Publication::new(i, format!("Paper {}", i))
                .with_year(1995 + i % 20)
                .with_author(i % 37, format!("Author {}", i % 37))
                .with_counts((i * 13) % 200, (i * 7) % 60);
            if i % 4 == 0 {
                publication = publication.with_keyword(i % 11, format!("topic {}", i % 11));
            }
            publication
        })
        .collect();
    let citations = (1..count)
        .flat_map(|i| {
            (1..=fan_out as i64)
                .map(move |step| (i, (i * 31 + step * 17) % i))
                .map(|(from, to)| Citation::new(from, to))
        })
        .collect();
    GraphData {
        publications,
        citations,
    }
}

/// Writes a synthetic graph as JSON into a fresh temporary directory.
pub fn synthetic_graph_file(publication_count: usize, fan_out: usize) -> anyhow::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let data = synthetic_graph(publication_count, fan_out);
    fs::write(temp_dir.path().join("graph.json"), serde_json::to_string(&data)?)?;
    Ok(temp_dir)
}
