use crate::catalog::LabelCatalog;
use crate::error::SearchError;

/// One OR-group of a parsed query, carrying the original group text for
/// error reporting.
#[derive(Debug, Clone)]
pub struct Clause {
    pub ids: Vec<i32>,
    pub text: String,
}

/// Parse `term1+term2*term3` against the catalog: `*` separates
/// AND-clauses, `+` separates OR-members within a clause, members are
/// trimmed. An empty member fails the whole query as `InvalidFormat`;
/// a member missing from the catalog fails as `InvalidLabel`.
pub fn parse_filter(filter: &str, catalog: &LabelCatalog) -> Result<Vec<Clause>, SearchError> {
    let mut clauses = Vec::new();
    for group in filter.split('*') {
        let mut ids = Vec::new();
        for member in group.split('+') {
            let member = member.trim();
            if member.is_empty() {
                return Err(SearchError::InvalidFormat(filter.to_string()));
            }
            let Some(label) = catalog.lookup(member) else {
                return Err(SearchError::InvalidLabel(member.to_string()));
            };
            ids.push(label.id);
        }
        clauses.push(Clause {
            ids,
            text: group.to_string(),
        });
    }
    Ok(clauses)
}
