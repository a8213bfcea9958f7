//! Interactive numbered menu over a chart service.
//!
//! Input is read as whitespace separated tokens, so several answers may be
//! given on one line. Reaching end of input exits the loop.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::services::ChartService;
use crate::domain::{Employee, EmployeeId, NodeId};
use crate::infrastructure::{InfraError, InfraResult};

pub const MENU: &str = "\n1. Hire Employee\n2. Fire Employee\n3. Display Org Chart\n\
4. Calculate Salary Budget\n5. Find Common Boss\n6. Save to File\n\
7. Add Department\n8. Load from File\n0. Exit\nChoice: ";

pub const CHART_HEADER: &str = "\n~ ORGANIZATION STRUCTURE ~\n";
pub const CHART_FOOTER: &str = "~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~\n";

/// Whitespace tokenizer over a line reader.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Read lines until one has content. Returns false at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(true)
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }

    /// Remaining tokens of the current line joined by single spaces.
    fn rest_of_line(&mut self) -> io::Result<Option<String>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.pending.drain(..).collect::<Vec<_>>().join(" ")))
    }
}

/// Menu loop state: the chart being edited and the console streams.
pub struct Menu<R, W> {
    service: ChartService,
    data_file: PathBuf,
    input: Tokens<R>,
    out: W,
}

enum Step {
    Continue,
    Exit,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(service: ChartService, data_file: &Path, input: R, out: W) -> Self {
        Self {
            service,
            data_file: data_file.to_path_buf(),
            input: Tokens::new(input),
            out,
        }
    }

    pub fn service(&self) -> &ChartService {
        &self.service
    }

    /// Run until choice `0` or end of input.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> InfraResult<()> {
        loop {
            self.write(MENU)?;
            let Some(choice) = self.read_token()? else {
                debug!("menu: end of input");
                break;
            };
            let choice = match choice.parse::<u32>() {
                Ok(choice) => choice,
                Err(_) => {
                    self.writeln("Invalid choice.")?;
                    continue;
                }
            };
            debug!("menu: choice={}", choice);
            if let Step::Exit = self.dispatch(choice)? {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: u32) -> InfraResult<Step> {
        match choice {
            0 => Ok(Step::Exit),
            1 => self.hire(),
            2 => self.fire(),
            3 => self.display(),
            4 => self.budget(),
            5 => self.common_boss(),
            6 => self.save(),
            7 => self.add_department(),
            8 => self.load(),
            _ => {
                self.writeln("Invalid choice.")?;
                Ok(Step::Continue)
            }
        }
    }

    fn hire(&mut self) -> InfraResult<Step> {
        self.write("Enter Manager ID (0 for HQ) or department name: ")?;
        let Some(manager) = self.read_token()? else {
            return Ok(Step::Exit);
        };
        self.write("Enter Emp ID, Name, Position, Salary: ")?;
        let mut fields = Vec::with_capacity(4);
        for _ in 0..4 {
            match self.read_token()? {
                Some(token) => fields.push(token),
                None => return Ok(Step::Exit),
            }
        }

        let Some(id) = self.parse_id(&fields[0])? else {
            return Ok(Step::Continue);
        };
        let Ok(salary) = fields[3].parse::<f64>() else {
            self.writeln(&format!("Error: invalid salary: {}", fields[3]))?;
            return Ok(Step::Continue);
        };
        let employee = match Employee::new(id, fields[1].as_str(), fields[2].as_str(), salary) {
            Ok(employee) => employee,
            Err(e) => return self.report(e).map(|_| Step::Continue),
        };
        let name = employee.name.clone();

        let chart = self.service.chart_mut();
        let result = match manager.parse::<EmployeeId>() {
            Ok(manager_id) => chart.hire(manager_id, employee),
            Err(_) => match chart.find_department(&manager) {
                Some(dept) => chart.hire_under(dept, employee),
                None => {
                    self.writeln(&format!("Error: department not found: {}", manager))?;
                    return Ok(Step::Continue);
                }
            },
        };
        match result {
            Ok(hired) => self.writeln(&format!(
                "Employee {} hired under {}.",
                name, hired.manager_name
            ))?,
            Err(e) => self.report(e)?,
        }
        Ok(Step::Continue)
    }

    fn fire(&mut self) -> InfraResult<Step> {
        self.write("Enter ID to fire: ")?;
        let Some(token) = self.read_token()? else {
            return Ok(Step::Exit);
        };
        let Some(id) = self.parse_id(&token)? else {
            return Ok(Step::Continue);
        };
        match self.service.chart_mut().fire(id) {
            Ok(fired) => self.writeln(&format!(
                "Employee ID {} has been removed and subordinates promoted.",
                fired.id
            ))?,
            Err(e) => self.report(e)?,
        }
        Ok(Step::Continue)
    }

    fn display(&mut self) -> InfraResult<Step> {
        let rendered = self.service.chart().display();
        self.write(CHART_HEADER)?;
        self.write(&rendered)?;
        self.write(CHART_FOOTER)?;
        Ok(Step::Continue)
    }

    fn budget(&mut self) -> InfraResult<Step> {
        let total = self.service.chart().total_budget();
        self.writeln(&format!("Total Salary Budget: ${}", total))?;
        Ok(Step::Continue)
    }

    fn common_boss(&mut self) -> InfraResult<Step> {
        self.write("Enter two Employee IDs: ")?;
        let (Some(first), Some(second)) = (self.read_token()?, self.read_token()?) else {
            return Ok(Step::Exit);
        };
        let (Some(id1), Some(id2)) = (self.parse_id(&first)?, self.parse_id(&second)?) else {
            return Ok(Step::Continue);
        };
        let chart = self.service.chart();
        match chart.find_lowest_common_boss(id1, id2) {
            Ok(boss) => {
                let name = chart.display_name(boss).unwrap_or_default().to_string();
                self.writeln(&format!("Lowest Common Boss: {}", name))?;
            }
            Err(e) => self.report(e)?,
        }
        Ok(Step::Continue)
    }

    fn save(&mut self) -> InfraResult<Step> {
        match self.service.save(&self.data_file) {
            Ok(report) => {
                self.writeln(&format!("Data saved to {}", report.path.display()))?
            }
            Err(e) => self.report(e)?,
        }
        Ok(Step::Continue)
    }

    fn load(&mut self) -> InfraResult<Step> {
        let path = self.data_file.clone();
        match self.service.load(&path) {
            Ok(()) => self.writeln(&format!("Data loaded from {}", path.display()))?,
            Err(e) => self.report(e)?,
        }
        Ok(Step::Continue)
    }

    fn add_department(&mut self) -> InfraResult<Step> {
        self.write("Enter parent Manager ID (0 for HQ) or department name: ")?;
        let Some(parent) = self.read_token()? else {
            return Ok(Step::Exit);
        };
        self.write("Enter department name: ")?;
        let Some(name) = self.input.rest_of_line().map_err(read_err)? else {
            return Ok(Step::Exit);
        };

        if !is_referenceable(&name) {
            self.writeln(&format!(
                "Error: department name must be one word and not a number: {}",
                name
            ))?;
            return Ok(Step::Continue);
        }

        let Some(parent_idx) = self.resolve_parent(&parent) else {
            self.writeln(&format!("Error: manager or department not found: {}", parent))?;
            return Ok(Step::Continue);
        };
        match self.service.chart_mut().add_department(parent_idx, name.as_str()) {
            Ok(_) => {
                let parent_name = self
                    .service
                    .chart()
                    .display_name(parent_idx)
                    .unwrap_or_default()
                    .to_string();
                self.writeln(&format!("Department {} added under {}.", name, parent_name))?
            }
            Err(e) => self.report(e)?,
        }
        Ok(Step::Continue)
    }

    fn resolve_parent(&self, parent: &str) -> Option<NodeId> {
        let chart = self.service.chart();
        match parent.parse::<EmployeeId>() {
            Ok(id) => chart.resolve_manager(id),
            Err(_) => chart.find_department(parent),
        }
    }

    fn parse_id(&mut self, token: &str) -> InfraResult<Option<EmployeeId>> {
        match token.parse::<EmployeeId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.writeln(&format!("Error: invalid employee id: {}", token))?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, e: impl std::fmt::Display) -> InfraResult<()> {
        self.writeln(&format!("Error: {}", e))
    }

    fn read_token(&mut self) -> InfraResult<Option<String>> {
        self.input.next_token().map_err(read_err)
    }

    fn write(&mut self, text: &str) -> InfraResult<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| InfraError::io("write output", e))
    }

    fn writeln(&mut self, text: &str) -> InfraResult<()> {
        self.write(text)?;
        self.write("\n")
    }
}

/// Departments are picked at the manager prompts by a single token that is not an id.
fn is_referenceable(name: &str) -> bool {
    !name.contains(char::is_whitespace) && name.parse::<EmployeeId>().is_err()
}

fn read_err(e: io::Error) -> InfraError {
    InfraError::io("read input", e)
}
