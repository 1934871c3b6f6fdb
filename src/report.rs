use std::fmt;

use serde::{Serialize, Serializer};

use crate::{degree::DegreeDistribution, graph::*};

/// Statistics of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub input_edges: NumEdges,
    /// `None` if duplicates were kept.
    pub removed_duplicates: Option<NumEdges>,
    pub number_of_edges: NumEdges,
    pub number_of_nodes: NumNodes,
    pub largest_input_id: Option<Node>,
    #[serde(serialize_with = "serialize_buckets")]
    pub degree_distribution: DegreeDistribution,
    pub total_in_degree: Degree,
    pub total_out_degree: Degree,
}

fn serialize_buckets<S: Serializer>(
    dist: &DegreeDistribution,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    dist.buckets().serialize(serializer)
}

impl ConversionReport {
    pub fn average_degree(&self) -> f64 {
        if self.number_of_nodes == 0 {
            0.0
        } else {
            self.number_of_edges as f64 / self.number_of_nodes as f64
        }
    }

    pub fn removed_percentage(&self) -> f64 {
        match self.removed_duplicates {
            Some(removed) if self.input_edges > 0 => {
                100.0 * removed as f64 / self.input_edges as f64
            }
            _ => 0.0,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        value["average_degree"] = serde_json::json!(self.average_degree());
        serde_json::to_string_pretty(&value)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input contains {} edges", self.input_edges)?;
        if let Some(removed) = self.removed_duplicates {
            writeln!(
                f,
                "Removed {removed} ({:.4}%) edge duplicates",
                self.removed_percentage()
            )?;
        }
        writeln!(f, "Number of nodes: {}", self.number_of_nodes)?;
        writeln!(f, "Number of edges: {}", self.number_of_edges)?;
        writeln!(f, "Avg. Degree: {}", self.average_degree())?;
        match self.largest_input_id {
            Some(id) => writeln!(f, "Largest input node id: {id}")?,
            None => writeln!(f, "Largest input node id: -")?,
        }

        writeln!(f, "Degree distribution:")?;
        for (degree, count) in self.degree_distribution.iter() {
            writeln!(
                f,
                " [in-deg: {}, out-deg: {}] appears {count} times",
                degree.in_degree, degree.out_degree
            )?;
        }

        writeln!(
            f,
            "Total degree: in: {} out: {}",
            self.total_in_degree, self.total_out_degree
        )
    }
}
