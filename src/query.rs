use std::sync::LazyLock;

use regex::Regex;

use crate::config::RunConfig;
use crate::error::Error;

// The arXiv query grammar has no operator precedence; it is left-to-right
// token substitution. Whoever embeds a composite inside another composite
// must ask for grouping explicitly, or the joined string changes meaning.

/// One node of a search query. Term values are inserted verbatim; callers
/// pre-encode quotes, spaces and wildcards before building a `Term`.
#[derive(Debug, Clone)]
pub enum Expression {
    Term(String),
    Or(Vec<Expression>),
    And(Vec<Expression>),
    AndNot(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Serializes the node. A supplied `prefix` is applied to every child
    /// individually, not once to the group; `group` wraps the result in
    /// URL-escaped parentheses.
    pub fn query_string(&self, prefix: Option<&str>, group: bool) -> Result<String, Error> {
        let query = match self {
            Expression::Term(value) => match prefix {
                Some(p) => format!("{}:{}", p, value),
                None => value.clone(),
            },
            Expression::Or(children) => Self::join(children, "+OR+", prefix)?,
            Expression::And(children) => Self::join(children, "+AND+", prefix)?,
            Expression::AndNot(left, right) => format!(
                "{}+ANDNOT+{}",
                left.query_string(prefix, false)?,
                right.query_string(prefix, false)?
            ),
        };
        Ok(if group {
            format!("%28{}%29", query)
        } else {
            query
        })
    }

    fn join(children: &[Expression], token: &str, prefix: Option<&str>) -> Result<String, Error> {
        if children.is_empty() {
            return Err(Error::InvalidExpression);
        }
        let parts = children
            .iter()
            .map(|child| child.query_string(prefix, false))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(token))
    }
}

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

/// Inclusive day-boundary range in the arXiv date-time encoding:
/// `[YYYYMMDD0000, YYYYMMDD2359]`. Digits are treated as opaque beyond the
/// pattern; the API rejects impossible days itself.
#[derive(Debug, Clone)]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}

impl DateWindow {
    pub fn new(start: &str, end: &str) -> Result<Self, Error> {
        Ok(DateWindow {
            start: Self::day_token(start, "0000")?,
            end: Self::day_token(end, "2359")?,
        })
    }

    fn day_token(date: &str, time: &str) -> Result<String, Error> {
        let caps = DATE_PATTERN
            .captures(date)
            .ok_or_else(|| Error::InvalidDateFormat(date.to_string()))?;
        Ok(format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], time))
    }

    pub fn fragment(&self, field: &str) -> String {
        format!("{}:[{}+TO+{}]", field, self.start, self.end)
    }
}

/// The two result partitions: papers first submitted in the window vs.
/// papers revised in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Submitted,
    LastUpdated,
}

impl Axis {
    /// arXiv field name, used both as date filter and sort key.
    pub fn date_field(self) -> &'static str {
        match self {
            Axis::Submitted => "submittedDate",
            Axis::LastUpdated => "lastUpdatedDate",
        }
    }
}

/// Assembles the full `search_query` value for one axis:
/// `(hits ANDNOT vetoes) AND (categories) AND (date window)`, every
/// composite sub-result parenthesized before it is embedded.
pub fn compile(config: &RunConfig, axis: Axis, window: &DateWindow) -> Result<String, Error> {
    let hits = search_expression(config)?;
    let categories = category_expression(&config.categories)?;
    let dates = window.fragment(axis.date_field());
    Expression::And(vec![
        Expression::Term(hits),
        Expression::Term(categories),
        Expression::Term(dates),
    ])
    .query_string(None, false)
}

// Search terms are matched against both the title and abstract fields;
// vetoes are subtracted unless there are none.
fn search_expression(config: &RunConfig) -> Result<String, Error> {
    let terms: Vec<Expression> = config
        .queries
        .iter()
        .cloned()
        .map(Expression::Term)
        .collect();
    let title_hits = Expression::Or(terms.clone()).query_string(Some("ti"), true)?;
    let abstract_hits = Expression::Or(terms).query_string(Some("abs"), true)?;
    let hits = Expression::Or(vec![
        Expression::Term(title_hits),
        Expression::Term(abstract_hits),
    ])
    .query_string(None, true)?;

    if config.vetoes.is_empty() {
        return Ok(hits);
    }
    let vetoes = veto_expression(&config.vetoes)?;
    Expression::AndNot(
        Box::new(Expression::Term(hits)),
        Box::new(Expression::Term(vetoes)),
    )
    .query_string(None, true)
}

fn veto_expression(vetoes: &[String]) -> Result<String, Error> {
    let mut prefixed = Vec::with_capacity(vetoes.len() * 2);
    for prefix in ["ti", "abs"] {
        for veto in vetoes {
            prefixed.push(Expression::Term(veto.clone()).query_string(Some(prefix), false)?);
        }
    }
    Expression::Or(prefixed.into_iter().map(Expression::Term).collect()).query_string(None, true)
}

fn category_expression(categories: &[String]) -> Result<String, Error> {
    let terms = categories.iter().cloned().map(Expression::Term).collect();
    Expression::Or(terms).query_string(Some("cat"), true)
}
