use chrono::NaiveDate;
use payxpert_core::{
    open_db_in_memory, CompensationPolicy, EmployeeProfile, EmployeeService, ErrorKind,
    PayRateTable, PayrollService, ServiceError, ValidationError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rusqlite::Connection;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn profile(position: &str, joining_date: NaiveDate) -> EmployeeProfile {
    EmployeeProfile {
        first_name: "Lena".to_string(),
        last_name: "Ortiz".to_string(),
        date_of_birth: date(1988, 2, 20),
        gender: "F".to_string(),
        email: "lena.ortiz@payxpert.test".to_string(),
        phone_number: "555-010-2030".to_string(),
        address: "31 Mill Lane".to_string(),
        position: position.to_string(),
        joining_date,
        termination_date: None,
    }
}

fn add_employee(conn: &Connection, position: &str) -> i64 {
    EmployeeService::new(conn)
        .add_employee(&profile(position, date(2020, 1, 1)))
        .unwrap()
}

fn payroll_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM payroll;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn generate_prorates_salary_and_withholding() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Engineer");

    let payroll = service
        .generate_payroll(employee_id, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap();

    assert_eq!(payroll.employee_id, employee_id);
    assert_eq!(payroll.gross_amount, dec!(6369.86));
    assert_eq!(payroll.deductions, dec!(849.32));
    assert_eq!(payroll.net_amount, dec!(5520.54));
    assert_eq!(service.get_payroll_by_id(payroll.id).unwrap(), payroll);
}

#[test]
fn zero_length_period_pays_one_day() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "manager");

    let payroll = service
        .generate_payroll(employee_id, date(2024, 1, 15), date(2024, 1, 15))
        .unwrap();

    assert_eq!(payroll.gross_amount, dec!(246.58));
    assert_eq!(payroll.deductions, dec!(35.62));
    assert_eq!(payroll.net_amount, dec!(210.96));
}

#[test]
fn reversed_period_is_invalid_and_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Engineer");

    let err = service
        .generate_payroll(employee_id, date(2024, 2, 1), date(2024, 1, 1))
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidInput(ValidationError::InvalidPeriod { .. })
    ));
    assert_eq!(payroll_count(&conn), 0);
}

#[test]
fn year_past_9999_is_invalid_and_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Engineer");

    let err = service
        .generate_payroll(employee_id, date(9999, 12, 1), date(10_000, 1, 31))
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidInput(ValidationError::DateOutOfRange {
            field: "period end",
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(payroll_count(&conn), 0);
}

#[test]
fn oversized_salary_fails_generation_instead_of_overflowing() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy {
        pay_rates: PayRateTable::new([("Engineer".to_string(), Decimal::MAX)], None),
        ..CompensationPolicy::standard()
    };
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Engineer");

    let err = service
        .generate_payroll(employee_id, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap_err();

    assert!(matches!(err, ServiceError::PayrollGeneration(_)));
    assert_eq!(err.kind(), ErrorKind::ComputationFailure);
    assert_eq!(payroll_count(&conn), 0);
}

#[test]
fn missing_employee_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);

    let err = service
        .generate_payroll(9, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmployeeNotFound(9)));
    assert_eq!(payroll_count(&conn), 0);
}

#[test]
fn unknown_position_fails_generation() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Astronaut");

    let err = service
        .generate_payroll(employee_id, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap_err();
    assert!(matches!(err, ServiceError::PayrollGeneration(_)));
    assert_eq!(err.kind(), ErrorKind::ComputationFailure);
    assert_eq!(payroll_count(&conn), 0);
}

#[test]
fn default_salary_covers_unknown_positions() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy {
        pay_rates: PayRateTable::new(Vec::new(), Some(dec!(36500))),
        ..CompensationPolicy::standard()
    };
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Astronaut");

    let payroll = service
        .generate_payroll(employee_id, date(2024, 3, 1), date(2024, 3, 10))
        .unwrap();
    assert_eq!(payroll.gross_amount, dec!(1000));
}

#[test]
fn period_is_clipped_to_employment_window() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = EmployeeService::new(&conn)
        .add_employee(&profile("Engineer", date(2024, 1, 17)))
        .unwrap();

    let payroll = service
        .generate_payroll(employee_id, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap();
    assert_eq!(payroll.period_start, date(2024, 1, 1));
    assert_eq!(payroll.gross_amount, dec!(3082.19));

    let err = service
        .generate_payroll(employee_id, date(2023, 12, 1), date(2023, 12, 31))
        .unwrap_err();
    assert!(matches!(err, ServiceError::PayrollGeneration(_)));
}

#[test]
fn payrolls_for_employee_are_ordered_and_require_the_employee() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Engineer");

    assert!(service
        .get_payrolls_for_employee(employee_id)
        .unwrap()
        .is_empty());

    let march = service
        .generate_payroll(employee_id, date(2024, 3, 1), date(2024, 3, 31))
        .unwrap();
    let january = service
        .generate_payroll(employee_id, date(2024, 1, 1), date(2024, 1, 31))
        .unwrap();

    let listed: Vec<_> = service
        .get_payrolls_for_employee(employee_id)
        .unwrap()
        .into_iter()
        .map(|payroll| payroll.id)
        .collect();
    assert_eq!(listed, vec![january.id, march.id]);

    assert!(matches!(
        service.get_payrolls_for_employee(employee_id + 1).unwrap_err(),
        ServiceError::EmployeeNotFound(_)
    ));
}

#[test]
fn payrolls_for_period_use_inclusive_overlap() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Analyst");

    let first_half = service
        .generate_payroll(employee_id, date(2024, 1, 1), date(2024, 1, 15))
        .unwrap();
    let second_half = service
        .generate_payroll(employee_id, date(2024, 1, 16), date(2024, 1, 31))
        .unwrap();

    let overlapping = service
        .get_payrolls_for_period(date(2024, 1, 10), date(2024, 1, 20))
        .unwrap();
    assert_eq!(overlapping, vec![first_half.clone(), second_half.clone()]);
    assert!(overlapping
        .iter()
        .all(|payroll| payroll.overlaps(date(2024, 1, 10), date(2024, 1, 20))));

    let boundary = service
        .get_payrolls_for_period(date(2024, 1, 15), date(2024, 1, 15))
        .unwrap();
    assert_eq!(boundary, vec![first_half]);

    assert!(service
        .get_payrolls_for_period(date(2024, 2, 1), date(2024, 2, 28))
        .unwrap()
        .is_empty());

    assert!(matches!(
        service
            .get_payrolls_for_period(date(2024, 2, 28), date(2024, 2, 1))
            .unwrap_err(),
        ServiceError::InvalidInput(_)
    ));
}

#[test]
fn missing_payroll_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);

    let err = service.get_payroll_by_id(77).unwrap_err();
    assert!(matches!(err, ServiceError::PayrollNotFound(77)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn net_always_equals_gross_minus_deductions() {
    let conn = open_db_in_memory().unwrap();
    let policy = CompensationPolicy::standard();
    let service = PayrollService::new(&conn, &policy);
    let employee_id = add_employee(&conn, "Director");

    for (start, end) in [
        (date(2024, 1, 1), date(2024, 1, 31)),
        (date(2024, 2, 1), date(2024, 2, 29)),
        (date(2024, 3, 1), date(2024, 3, 7)),
    ] {
        let payroll = service.generate_payroll(employee_id, start, end).unwrap();
        assert_eq!(payroll.net_amount, payroll.gross_amount - payroll.deductions);
        assert!(payroll.deductions > Decimal::ZERO);
    }
}
