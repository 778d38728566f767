use chrono::{Local, NaiveDate, NaiveDateTime};
use payxpert_core::{
    open_db_in_memory, EmployeeProfile, EmployeeService, ErrorKind, FinancialRecordRepository,
    FinancialRecordService, ServiceError, SqliteFinancialRecordRepository, ValidationError,
};
use rust_decimal_macros::dec;
use rusqlite::Connection;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, minute, 0).unwrap()
}

fn add_employees(conn: &Connection, count: usize) -> Vec<i64> {
    let service = EmployeeService::new(conn);
    (1..=count)
        .map(|index| {
            service
                .add_employee(&EmployeeProfile {
                    first_name: format!("Sam{index}"),
                    last_name: "Okafor".to_string(),
                    date_of_birth: date(1995, 5, 5),
                    gender: "M".to_string(),
                    email: format!("sam{index}@payxpert.test"),
                    phone_number: "+2348012345678".to_string(),
                    address: "18 Marina Road".to_string(),
                    position: "Accountant".to_string(),
                    joining_date: date(2022, 2, 1),
                    termination_date: None,
                })
                .unwrap()
        })
        .collect()
}

fn ledger_count(conn: &Connection) -> i64 {
    SqliteFinancialRecordRepository::new(conn)
        .count_records()
        .unwrap()
}

#[test]
fn add_stamps_current_time_and_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let ids = add_employees(&conn, 1);
    let service = FinancialRecordService::new(&conn);

    let before = Local::now().naive_local().date();
    let record = service
        .add_financial_record(ids[0], "  Quarterly bonus ", "1250.00", " bonus ")
        .unwrap();
    let after = Local::now().naive_local().date();

    assert_eq!(record.description, "Quarterly bonus");
    assert_eq!(record.record_type, "bonus");
    assert_eq!(record.amount, dec!(1250.00));
    let recorded_on = record.record_date.date();
    assert!(recorded_on == before || recorded_on == after);
    assert_eq!(service.get_financial_record_by_id(record.id).unwrap(), record);
}

#[test]
fn debits_are_allowed() {
    let conn = open_db_in_memory().unwrap();
    let ids = add_employees(&conn, 1);
    let service = FinancialRecordService::new(&conn);

    let record = service
        .add_financial_record(ids[0], "Laptop damage", "-340.75", "deduction")
        .unwrap();
    assert_eq!(record.amount, dec!(-340.75));
}

#[test]
fn empty_description_is_invalid_and_ledger_is_unchanged() {
    let conn = open_db_in_memory().unwrap();
    add_employees(&conn, 3);
    let service = FinancialRecordService::new(&conn);
    service
        .add_financial_record(3, "Travel", "80", "reimbursement")
        .unwrap();

    let err = service
        .add_financial_record(3, "", "10.0", "bonus")
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidInput(ValidationError::EmptyField("description"))
    ));
    assert_eq!(ledger_count(&conn), 1);
}

#[test]
fn malformed_amount_and_empty_type_are_invalid() {
    let conn = open_db_in_memory().unwrap();
    let ids = add_employees(&conn, 1);
    let service = FinancialRecordService::new(&conn);

    for amount in ["ten", "NaN", "12,50", ""] {
        let err = service
            .add_financial_record(ids[0], "Bonus", amount, "bonus")
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::InvalidInput(ValidationError::InvalidAmount(_))),
            "amount `{amount}` should be rejected"
        );
    }

    let err = service
        .add_financial_record(ids[0], "Bonus", "10", "   ")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(ledger_count(&conn), 0);
}

#[test]
fn missing_employee_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = FinancialRecordService::new(&conn);

    assert!(matches!(
        service
            .add_financial_record(5, "Bonus", "10", "bonus")
            .unwrap_err(),
        ServiceError::EmployeeNotFound(5)
    ));
    assert!(matches!(
        service.get_financial_records_for_employee(5).unwrap_err(),
        ServiceError::EmployeeNotFound(5)
    ));
    assert!(matches!(
        service.get_financial_record_by_id(5).unwrap_err(),
        ServiceError::FinancialRecordNotFound(5)
    ));
}

#[test]
fn records_for_employee_are_oldest_first() {
    let conn = open_db_in_memory().unwrap();
    let ids = add_employees(&conn, 2);
    let service = FinancialRecordService::new(&conn);

    assert!(service
        .get_financial_records_for_employee(ids[0])
        .unwrap()
        .is_empty());

    let later = service
        .add_financial_record_at(ids[0], "Bonus", "300", "bonus", at(2024, 5, 2, 9, 0))
        .unwrap();
    let earlier = service
        .add_financial_record_at(ids[0], "Advance", "-100", "advance", at(2024, 4, 30, 17, 45))
        .unwrap();
    service
        .add_financial_record_at(ids[1], "Bonus", "300", "bonus", at(2024, 5, 1, 9, 0))
        .unwrap();

    let listed = service.get_financial_records_for_employee(ids[0]).unwrap();
    assert_eq!(listed, vec![earlier, later]);
}

#[test]
fn records_for_date_ignore_time_of_day() {
    let conn = open_db_in_memory().unwrap();
    let ids = add_employees(&conn, 2);
    let service = FinancialRecordService::new(&conn);

    let midnight = service
        .add_financial_record_at(ids[0], "Meal", "12.5", "expense", at(2024, 6, 10, 0, 0))
        .unwrap();
    let evening = service
        .add_financial_record_at(ids[1], "Taxi", "30", "expense", at(2024, 6, 10, 23, 59))
        .unwrap();
    service
        .add_financial_record_at(ids[0], "Hotel", "210", "expense", at(2024, 6, 11, 0, 0))
        .unwrap();

    let on_day = service.get_financial_records_for_date(date(2024, 6, 10)).unwrap();
    assert_eq!(on_day, vec![midnight, evening]);
    assert!(service
        .get_financial_records_for_date(date(2024, 6, 9))
        .unwrap()
        .is_empty());
}

#[test]
fn backdated_entry_outside_four_digit_years_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let ids = add_employees(&conn, 1);
    let service = FinancialRecordService::new(&conn);

    let err = service
        .add_financial_record_at(
            ids[0],
            "Archive import",
            "15.00",
            "adjustment",
            at(10_000, 1, 1, 9, 0),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidInput(ValidationError::DateOutOfRange {
            field: "record date",
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(ledger_count(&conn), 0);
}
