//! Student score report.

use tessera_core::{Document, Result};

use crate::collection::DocumentCollection;
use crate::pipeline::{Expr, SortOrder, Stage};

/// Field added to each student by [`top_students`].
pub const AVERAGE_FIELD: &str = "averageScore";

/// Pipeline computing each student's average topic score, best first.
///
/// A student with an empty `topics` list gets a null average and sorts last.
pub fn top_students_pipeline() -> Vec<Stage> {
    vec![
        Stage::AddFields(vec![(
            AVERAGE_FIELD.to_string(),
            Expr::divide(
                Expr::sum(Expr::field("topics.score")),
                Expr::size(Expr::field("topics")),
            ),
        )]),
        Stage::Sort(vec![(AVERAGE_FIELD.to_string(), SortOrder::Descending)]),
    ]
}

/// Every student with `averageScore` added, sorted by it descending.
pub fn top_students(collection: &dyn DocumentCollection) -> Result<Vec<Document>> {
    collection.aggregate(&top_students_pipeline())
}
