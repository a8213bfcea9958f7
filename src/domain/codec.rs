//! Flat text persistence format for charts.
//!
//! One record per node in pre-order, each followed by its child count:
//!
//! ```text
//! 1,<department name>
//! <child count>
//! 0,<id>,<name>,<title>,<salary>
//! <child count>
//! ```
//!
//! There is no escaping, so text fields must not contain commas or line breaks.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::arena::NodeId;
use crate::domain::chart::OrgChart;
use crate::domain::entities::{Department, Employee, EmployeeId, NodeKind};
use crate::domain::error::DomainError;

const DEPARTMENT_FLAG: &str = "1";
const EMPLOYEE_FLAG: &str = "0";
const EMPLOYEE_FIELDS: usize = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("line {line}: invalid node kind flag: {found:?}")]
    InvalidKind { line: usize, found: String },

    #[error("line {line}: expected {expected} employee fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid {field}: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {source}")]
    InvalidEmployee {
        line: usize,
        #[source]
        source: DomainError,
    },

    #[error("line {line}: root record must be a department")]
    RootNotDepartment { line: usize },

    #[error("line {line}: unexpected content after the last record")]
    TrailingContent { line: usize },

    #[error("{field} cannot be saved, it contains a comma or line break: {value:?}")]
    UnencodableField { field: &'static str, value: String },
}

pub type CodecResult<T> = Result<T, CodecError>;

fn check_field(field: &'static str, value: &str) -> CodecResult<()> {
    if value.contains([',', '\n', '\r']) {
        return Err(CodecError::UnencodableField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Serialize the whole chart, pre-order, in display order.
///
/// Fails without producing output when a text field cannot be represented.
#[instrument(level = "debug", skip(chart))]
pub fn encode(chart: &OrgChart) -> CodecResult<String> {
    let mut out = String::new();
    for (_, _, node) in chart.iter() {
        match &node.kind {
            NodeKind::Department(dept) => {
                check_field("department name", &dept.name)?;
                out.push_str(&format!("{},{}\n", DEPARTMENT_FLAG, dept.name));
            }
            NodeKind::Employee(emp) => {
                check_field("employee name", &emp.name)?;
                check_field("employee title", &emp.title)?;
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    EMPLOYEE_FLAG, emp.id, emp.name, emp.title, emp.salary
                ));
            }
        }
        out.push_str(&format!("{}\n", node.children.len()));
    }
    Ok(out)
}

/// Numbered line reader; line numbers are 1-based.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            inner: content.lines().enumerate(),
            last: 0,
        }
    }

    fn next_line(&mut self, expected: &'static str) -> CodecResult<(usize, &'a str)> {
        match self.inner.next() {
            Some((idx, line)) => {
                self.last = idx + 1;
                Ok((idx + 1, line))
            }
            None => Err(CodecError::UnexpectedEof {
                line: self.last + 1,
                expected,
            }),
        }
    }

    fn next_count(&mut self) -> CodecResult<usize> {
        let (line, text) = self.next_line("child count")?;
        text.trim()
            .parse()
            .map_err(|_| CodecError::InvalidNumber {
                line,
                field: "child count",
                value: text.to_string(),
            })
    }

    fn next_record(&mut self) -> CodecResult<(usize, NodeKind)> {
        let (line, text) = self.next_line("node record")?;
        Ok((line, parse_record(line, text)?))
    }
}

fn parse_record(line: usize, text: &str) -> CodecResult<NodeKind> {
    let (flag, rest) = text.split_once(',').unwrap_or((text, ""));
    match flag {
        DEPARTMENT_FLAG => Ok(NodeKind::Department(Department::new(rest))),
        EMPLOYEE_FLAG => {
            let fields: Vec<&str> = rest.split(',').collect();
            if fields.len() != EMPLOYEE_FIELDS {
                return Err(CodecError::FieldCount {
                    line,
                    expected: EMPLOYEE_FIELDS,
                    found: fields.len(),
                });
            }
            let id: EmployeeId =
                fields[0]
                    .trim()
                    .parse()
                    .map_err(|_| CodecError::InvalidNumber {
                        line,
                        field: "employee id",
                        value: fields[0].to_string(),
                    })?;
            let salary: f64 = fields[3]
                .trim()
                .parse()
                .map_err(|_| CodecError::InvalidNumber {
                    line,
                    field: "salary",
                    value: fields[3].to_string(),
                })?;
            let emp = Employee::new(id, fields[1], fields[2], salary)
                .map_err(|source| CodecError::InvalidEmployee { line, source })?;
            Ok(NodeKind::Employee(emp))
        }
        other => Err(CodecError::InvalidKind {
            line,
            found: other.to_string(),
        }),
    }
}

/// Rebuild a chart from [`encode`] output.
///
/// Uses an explicit stack of `(parent, children still expected)` so deep
/// charts do not recurse.
#[instrument(level = "debug", skip(content))]
pub fn decode(content: &str) -> CodecResult<OrgChart> {
    let mut lines = Lines::new(content);

    let (line, root_kind) = lines.next_record()?;
    let mut chart = match root_kind {
        NodeKind::Department(dept) => OrgChart::new(dept.name),
        NodeKind::Employee(_) => return Err(CodecError::RootNotDepartment { line }),
    };
    let root_children = lines.next_count()?;

    let mut stack: Vec<(NodeId, usize)> = vec![(chart.root(), root_children)];
    while let Some((parent, remaining)) = stack.last_mut() {
        if *remaining == 0 {
            stack.pop();
            continue;
        }
        *remaining -= 1;
        let parent = *parent;

        let (line, kind) = lines.next_record()?;
        let node = match kind {
            NodeKind::Department(dept) => chart.add_department(parent, dept.name),
            NodeKind::Employee(emp) => chart.hire_under(parent, emp).map(|hired| hired.node),
        }
        .map_err(|source| CodecError::InvalidEmployee { line, source })?;

        let count = lines.next_count()?;
        stack.push((node, count));
    }

    for (idx, rest) in lines.inner.by_ref() {
        if !rest.trim().is_empty() {
            return Err(CodecError::TrailingContent { line: idx + 1 });
        }
    }

    debug!("decode: {} nodes", chart.size());
    Ok(chart)
}
