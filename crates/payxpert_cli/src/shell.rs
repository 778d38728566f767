//! Interactive menu loop.
//!
//! # Responsibility
//! - Render the main and section menus and read operator choices.
//! - Translate each choice into a [`Command`] and run it against the services.
//! - Print results as JSON and errors as `Error: ...` lines.
//!
//! # Invariants
//! - A failed command never ends the loop; only `Exit` or closed input do.
//! - Menu dispatch is exhaustive over [`Section`] and [`Command`].

use chrono::NaiveDate;
use log::debug;
use payxpert_core::{
    parse_date, parse_optional_date, Employee, EmployeeProfile, PayrollServices, ServiceError,
    ValidationError,
};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Answer that clears an optional field during an update.
const CLEAR_ANSWER: &str = "-";

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Employees,
    Payroll,
    Tax,
    FinancialRecords,
    Exit,
}

impl Section {
    const MENU: [(&'static str, Section); 5] = [
        ("Employee Management", Section::Employees),
        ("Payroll Processing", Section::Payroll),
        ("Tax Calculation", Section::Tax),
        ("Financial Reporting", Section::FinancialRecords),
        ("Exit", Section::Exit),
    ];

    pub fn from_choice(choice: &str) -> Option<Self> {
        pick(&Self::MENU, choice)
    }

    fn title(self) -> &'static str {
        match self {
            Self::Employees => "EMPLOYEES",
            Self::Payroll => "PAYROLL",
            Self::Tax => "TAX",
            Self::FinancialRecords => "FINANCIAL RECORDS",
            Self::Exit => "EXIT",
        }
    }

    fn entries(self) -> &'static [(&'static str, SectionChoice)] {
        use Command::*;
        use SectionChoice::{Back, Run};
        match self {
            Self::Employees => &[
                ("Get Employee by ID", Run(GetEmployee)),
                ("Get All Employees", Run(ListEmployees)),
                ("Add Employee", Run(AddEmployee)),
                ("Update Employee", Run(UpdateEmployee)),
                ("Remove Employee", Run(RemoveEmployee)),
                ("Back to Main Menu", Back),
            ],
            Self::Payroll => &[
                ("Generate Payroll", Run(GeneratePayroll)),
                ("Get Payroll by ID", Run(GetPayroll)),
                ("Get Payrolls for Employee", Run(PayrollsForEmployee)),
                ("Get Payrolls for Period", Run(PayrollsForPeriod)),
                ("Back to Main Menu", Back),
            ],
            Self::Tax => &[
                ("Calculate Tax", Run(CalculateTax)),
                ("Get Tax by ID", Run(GetTax)),
                ("Get Taxes for Employee", Run(TaxesForEmployee)),
                ("Get Taxes for Year", Run(TaxesForYear)),
                ("Back to Main Menu", Back),
            ],
            Self::FinancialRecords => &[
                ("Add Financial Record", Run(AddFinancialRecord)),
                ("Get Financial Record by ID", Run(GetFinancialRecord)),
                (
                    "Get Financial Records for Employee",
                    Run(FinancialRecordsForEmployee),
                ),
                ("Get Financial Records for Date", Run(FinancialRecordsForDate)),
                ("Back to Main Menu", Back),
            ],
            Self::Exit => &[],
        }
    }

    pub fn choose(self, choice: &str) -> Option<SectionChoice> {
        pick(self.entries(), choice)
    }
}

/// Entry picked inside a section menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionChoice {
    Run(Command),
    Back,
}

/// Every operation the shell can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetEmployee,
    ListEmployees,
    AddEmployee,
    UpdateEmployee,
    RemoveEmployee,
    GeneratePayroll,
    GetPayroll,
    PayrollsForEmployee,
    PayrollsForPeriod,
    CalculateTax,
    GetTax,
    TaxesForEmployee,
    TaxesForYear,
    AddFinancialRecord,
    GetFinancialRecord,
    FinancialRecordsForEmployee,
    FinancialRecordsForDate,
}

fn pick<T: Copy>(entries: &[(&'static str, T)], choice: &str) -> Option<T> {
    let index: usize = choice.trim().parse().ok()?;
    entries.get(index.checked_sub(1)?).map(|(_, value)| *value)
}

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("invalid input: {0}")]
    Input(#[from] ValidationError),
    #[error("invalid input: `{0}` is not a whole number")]
    NotANumber(String),
    #[error("failed to render result: {0}")]
    Render(#[from] serde_json::Error),
    #[error("input closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Menu loop over injected services and I/O handles.
pub struct Shell<'s, R, W> {
    services: &'s PayrollServices<'s>,
    input: R,
    output: W,
}

impl<'s, R: BufRead, W: Write> Shell<'s, R, W> {
    pub fn new(services: &'s PayrollServices<'s>, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
        }
    }

    /// Runs until the operator exits or input closes.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_main_menu()?;
            let Some(choice) = self.read_line("Enter your choice: ")? else {
                return Ok(());
            };
            match Section::from_choice(&choice) {
                Some(Section::Exit) => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                Some(section) => {
                    if !self.run_section(section)? {
                        return Ok(());
                    }
                }
                None => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    /// Returns `false` once input is closed.
    fn run_section(&mut self, section: Section) -> io::Result<bool> {
        loop {
            self.print_section_menu(section)?;
            let Some(choice) = self.read_line("Enter your choice: ")? else {
                return Ok(false);
            };
            match section.choose(&choice) {
                Some(SectionChoice::Back) => return Ok(true),
                Some(SectionChoice::Run(command)) => match self.execute(command) {
                    Ok(()) => {}
                    Err(CommandError::Closed) => return Ok(false),
                    Err(CommandError::Io(err)) => return Err(err),
                    Err(err) => {
                        debug!("event=shell_command module=cli status=error command={command:?}");
                        writeln!(self.output, "Error: {err}")?;
                    }
                },
                None => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        let services = self.services;
        match command {
            Command::GetEmployee => {
                let id = self.ask_id("Enter Employee ID: ")?;
                let employee = services.employees.get_employee_by_id(id)?;
                self.print_json("Employee", &employee)
            }
            Command::ListEmployees => {
                let employees = services.employees.get_all_employees()?;
                self.print_json("Employees", &employees)
            }
            Command::AddEmployee => {
                let profile = self.ask_profile(None)?;
                let id = services.employees.add_employee(&profile)?;
                writeln!(self.output, "Employee added with ID {id}.")?;
                Ok(())
            }
            Command::UpdateEmployee => {
                let id = self.ask_id("Enter Employee ID to update: ")?;
                let current = services.employees.get_employee_by_id(id)?;
                writeln!(self.output, "Leave a field blank to keep its current value.")?;
                let profile = self.ask_profile(Some(&current.profile))?;
                services
                    .employees
                    .update_employee(&Employee { id, profile })?;
                writeln!(self.output, "Employee {id} updated.")?;
                Ok(())
            }
            Command::RemoveEmployee => {
                let id = self.ask_id("Enter Employee ID to remove: ")?;
                services.employees.remove_employee(id)?;
                writeln!(self.output, "Employee {id} removed.")?;
                Ok(())
            }
            Command::GeneratePayroll => {
                let employee_id = self.ask_id("Enter Employee ID: ")?;
                let (start, end) = self.ask_period()?;
                let payroll = services
                    .payroll
                    .generate_payroll(employee_id, start, end)?;
                self.print_json("Payroll generated", &payroll)
            }
            Command::GetPayroll => {
                let id = self.ask_id("Enter Payroll ID: ")?;
                let payroll = services.payroll.get_payroll_by_id(id)?;
                self.print_json("Payroll", &payroll)
            }
            Command::PayrollsForEmployee => {
                let employee_id = self.ask_id("Enter Employee ID: ")?;
                let payrolls = services.payroll.get_payrolls_for_employee(employee_id)?;
                self.print_json("Payrolls for employee", &payrolls)
            }
            Command::PayrollsForPeriod => {
                let (start, end) = self.ask_period()?;
                let payrolls = services.payroll.get_payrolls_for_period(start, end)?;
                self.print_json("Payrolls for period", &payrolls)
            }
            Command::CalculateTax => {
                let employee_id = self.ask_id("Enter Employee ID: ")?;
                let year = self.ask_year()?;
                let tax = services.tax.calculate_tax(employee_id, year)?;
                self.print_json("Tax calculated", &tax)
            }
            Command::GetTax => {
                let id = self.ask_id("Enter Tax ID: ")?;
                let tax = services.tax.get_tax_by_id(id)?;
                self.print_json("Tax", &tax)
            }
            Command::TaxesForEmployee => {
                let employee_id = self.ask_id("Enter Employee ID: ")?;
                let taxes = services.tax.get_taxes_for_employee(employee_id)?;
                self.print_json("Taxes for employee", &taxes)
            }
            Command::TaxesForYear => {
                let year = self.ask_year()?;
                let taxes = services.tax.get_taxes_for_year(year)?;
                self.print_json("Taxes for year", &taxes)
            }
            Command::AddFinancialRecord => {
                let employee_id = self.ask_id("Enter Employee ID: ")?;
                let description = self.ask("Enter Description: ")?;
                let amount = self.ask("Enter Amount: ")?;
                let record_type = self.ask("Enter Record Type: ")?;
                let record = services.financial_records.add_financial_record(
                    employee_id,
                    &description,
                    &amount,
                    &record_type,
                )?;
                self.print_json("Financial record added", &record)
            }
            Command::GetFinancialRecord => {
                let id = self.ask_id("Enter Record ID: ")?;
                let record = services.financial_records.get_financial_record_by_id(id)?;
                self.print_json("Financial record", &record)
            }
            Command::FinancialRecordsForEmployee => {
                let employee_id = self.ask_id("Enter Employee ID: ")?;
                let records = services
                    .financial_records
                    .get_financial_records_for_employee(employee_id)?;
                self.print_json("Financial records for employee", &records)
            }
            Command::FinancialRecordsForDate => {
                let date = self.ask_date("Enter Record Date (YYYY-MM-DD): ", "record date")?;
                let records = services
                    .financial_records
                    .get_financial_records_for_date(date)?;
                self.print_json("Financial records for date", &records)
            }
        }
    }

    /// Prompts for every profile field; with `current`, blank keeps the old value.
    fn ask_profile(
        &mut self,
        current: Option<&EmployeeProfile>,
    ) -> Result<EmployeeProfile, CommandError> {
        let first_name = self.ask_or_keep("First Name", current.map(|p| p.first_name.as_str()))?;
        let last_name = self.ask_or_keep("Last Name", current.map(|p| p.last_name.as_str()))?;
        let date_of_birth = self.ask_date_or_keep(
            "Date of Birth (YYYY-MM-DD)",
            "date of birth",
            current.map(|p| p.date_of_birth),
        )?;
        let gender = self.ask_or_keep("Gender", current.map(|p| p.gender.as_str()))?;
        let email = self.ask_or_keep("Email", current.map(|p| p.email.as_str()))?;
        let phone_number =
            self.ask_or_keep("Phone Number", current.map(|p| p.phone_number.as_str()))?;
        let address = self.ask_or_keep("Address", current.map(|p| p.address.as_str()))?;
        let position = self.ask_or_keep("Position", current.map(|p| p.position.as_str()))?;
        let joining_date = self.ask_date_or_keep(
            "Joining Date (YYYY-MM-DD)",
            "joining date",
            current.map(|p| p.joining_date),
        )?;
        let termination_date = self.ask_termination(current.and_then(|p| p.termination_date))?;

        Ok(EmployeeProfile {
            first_name,
            last_name,
            date_of_birth,
            gender,
            email,
            phone_number,
            address,
            position,
            joining_date,
            termination_date,
        })
    }

    /// Blank keeps `current`; [`CLEAR_ANSWER`] removes it.
    fn ask_termination(
        &mut self,
        current: Option<NaiveDate>,
    ) -> Result<Option<NaiveDate>, CommandError> {
        let prompt = match current {
            Some(date) => format!(
                "Enter Termination Date (YYYY-MM-DD, `{CLEAR_ANSWER}` to clear) [{date}]: "
            ),
            None => "Enter Termination Date (YYYY-MM-DD, optional): ".to_string(),
        };
        let answer = self.ask(&prompt)?;
        Ok(match answer.as_str() {
            "" => current,
            CLEAR_ANSWER => None,
            value => parse_optional_date("termination date", value)?,
        })
    }

    fn ask_or_keep(&mut self, label: &str, current: Option<&str>) -> Result<String, CommandError> {
        let prompt = match current {
            Some(value) => format!("Enter {label} [{value}]: "),
            None => format!("Enter {label}: "),
        };
        let answer = self.ask(&prompt)?;
        Ok(match current {
            Some(value) if answer.is_empty() => value.to_string(),
            _ => answer,
        })
    }

    fn ask_date_or_keep(
        &mut self,
        label: &str,
        field: &'static str,
        current: Option<NaiveDate>,
    ) -> Result<NaiveDate, CommandError> {
        let current_text = current.map(|date| date.to_string());
        let answer = self.ask_or_keep(label, current_text.as_deref())?;
        Ok(parse_date(field, &answer)?)
    }

    fn ask_period(&mut self) -> Result<(NaiveDate, NaiveDate), CommandError> {
        let start = self.ask_date("Enter Pay Period Start Date (YYYY-MM-DD): ", "period start")?;
        let end = self.ask_date("Enter Pay Period End Date (YYYY-MM-DD): ", "period end")?;
        Ok((start, end))
    }

    fn ask_date(&mut self, prompt: &str, field: &'static str) -> Result<NaiveDate, CommandError> {
        let answer = self.ask(prompt)?;
        Ok(parse_date(field, &answer)?)
    }

    fn ask_id(&mut self, prompt: &str) -> Result<i64, CommandError> {
        let answer = self.ask(prompt)?;
        answer
            .parse()
            .map_err(|_| CommandError::NotANumber(answer))
    }

    fn ask_year(&mut self) -> Result<i32, CommandError> {
        let answer = self.ask("Enter Tax Year: ")?;
        answer
            .parse()
            .map_err(|_| CommandError::NotANumber(answer))
    }

    fn ask(&mut self, prompt: &str) -> Result<String, CommandError> {
        self.read_line(prompt)?.ok_or(CommandError::Closed)
    }

    /// Prints `prompt` and reads one trimmed line; `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn print_json<T: Serialize>(&mut self, label: &str, value: &T) -> Result<(), CommandError> {
        let rendered = serde_json::to_string_pretty(value)?;
        writeln!(self.output, "{label}:\n{rendered}")?;
        Ok(())
    }

    fn print_main_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Main Menu ===")?;
        for (index, (label, _)) in Section::MENU.iter().enumerate() {
            writeln!(self.output, "{}. {label}", index + 1)?;
        }
        Ok(())
    }

    fn print_section_menu(&mut self, section: Section) -> io::Result<()> {
        writeln!(self.output, "\n=== {} ===", section.title())?;
        for (index, (label, _)) in section.entries().iter().enumerate() {
            writeln!(self.output, "{}. {label}", index + 1)?;
        }
        Ok(())
    }
}
