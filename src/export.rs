//! CSV export of node attributes.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::graph::NetworkNode;

pub const CSV_HEADER: &str = "ID,Label,Type,Degree,Betweenness,Closeness";

/// Quote a field when it contains a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header plus one row per node; centrality with three decimals, no trailing newline.
pub fn to_csv(nodes: &[NetworkNode]) -> String {
    let mut out = String::from(CSV_HEADER);
    for node in nodes {
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "\n{},{},{},{},{:.3},{:.3}",
            escape_field(&node.id),
            escape_field(&node.label),
            node.category.as_str(),
            node.degree,
            node.betweenness,
            node.closeness,
        );
    }
    out
}

pub fn write_csv(path: &Path, nodes: &[NetworkNode]) -> Result<()> {
    std::fs::write(path, to_csv(nodes)).map_err(|e| NetworkError::io(path, e))?;
    tracing::info!("Exported {} nodes to {:?}", nodes.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ActorCategory;

    fn sample() -> Vec<NetworkNode> {
        vec![
            NetworkNode::new("moh", "Ministry of Health", ActorCategory::Government)
                .with_degree(4)
                .with_centrality(0.5, 0.8),
            NetworkNode::new("who", "WHO", ActorCategory::International)
                .with_degree(2)
                .with_centrality(0.12345, 1.0),
            NetworkNode::new("ngo1", "Health, Hope & \"Care\"", ActorCategory::Ngo),
        ]
    }

    #[test]
    fn header_and_one_row_per_node() {
        let csv = to_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID,Label,Type,Degree,Betweenness,Closeness");
        assert_eq!(lines[1], "moh,Ministry of Health,government,4,0.500,0.800");
        assert_eq!(lines[2], "who,WHO,international,2,0.123,1.000");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn centrality_has_three_decimals() {
        let csv = to_csv(&sample());
        for line in csv.lines().skip(1) {
            let fields: Vec<&str> = line.rsplitn(3, ',').collect();
            for value in &fields[..2] {
                let decimals = value.split('.').nth(1).unwrap();
                assert_eq!(decimals.len(), 3, "{value}");
            }
        }
    }

    #[test]
    fn labels_with_delimiters_are_quoted() {
        let csv = to_csv(&sample());
        assert!(csv.ends_with("ngo1,\"Health, Hope & \"\"Care\"\"\",ngo,0,0.000,0.000"));
    }

    #[test]
    fn empty_graph_is_header_only() {
        assert_eq!(to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actors.csv");
        write_csv(&path, &sample()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_csv(&sample()));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("actors.csv");
        assert!(matches!(
            write_csv(&path, &sample()),
            Err(NetworkError::Io { .. })
        ));
    }
}
