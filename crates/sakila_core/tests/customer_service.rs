use sakila_core::{
    open_sample_db_in_memory, CustomerFilter, CustomerRepository, CustomerService,
    InMemoryCustomerRepository, RepoError, SqliteCustomerRepository,
};

fn mar_in_long_cities() -> CustomerFilter {
    CustomerFilter {
        first_name_prefix: Some("Mar".to_string()),
        city_longer_than: Some(10),
        ..CustomerFilter::default()
    }
}

#[test]
fn get_by_email_trims_input_and_get_reports_missing_ids() {
    let conn = open_sample_db_in_memory().unwrap();
    let service = CustomerService::new(SqliteCustomerRepository::try_new(&conn).unwrap());

    let found = service
        .get_by_email("  CAROLYN.PEREZ@sakilacustomer.org ")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, 42);
    assert!(service
        .get_by_email("nobody@sakilacustomer.org")
        .unwrap()
        .is_none());

    assert!(matches!(service.get(600), Err(RepoError::NotFound(600))));
    assert_eq!(service.repository().count().unwrap(), 599);
}

#[test]
fn search_page_slices_filtered_results() {
    let conn = open_sample_db_in_memory().unwrap();
    let service = CustomerService::new(SqliteCustomerRepository::try_new(&conn).unwrap());
    let filter = mar_in_long_cities();

    let all = service.search(&filter).unwrap();
    assert_eq!(all.len(), 5);

    let first = service
        .search_page(&filter, 0, 3, Some("lastName,desc"))
        .unwrap();
    let second = service
        .search_page(&filter, 1, 3, Some("lastName,desc"))
        .unwrap();
    assert_eq!(first.total_elements, 5);
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 2);
    assert!(!second.has_next());

    let last_names: Vec<_> = first
        .iter()
        .chain(second.iter())
        .map(|c| c.last_name.as_str())
        .collect();
    assert_eq!(last_names, vec!["YEE", "WADE", "TUCKER", "THORN", "SNYDER"]);
}

#[test]
fn search_page_rejects_bad_paging_input() {
    let conn = open_sample_db_in_memory().unwrap();
    let service = CustomerService::new(SqliteCustomerRepository::try_new(&conn).unwrap());
    let filter = CustomerFilter::default();

    assert!(matches!(
        service.search_page(&filter, 0, 0, None),
        Err(RepoError::InvalidArgument(arg)) if arg.name == "size"
    ));
    assert!(matches!(
        service.search_page(&filter, 0, 5, Some("nickname")),
        Err(RepoError::InvalidArgument(arg)) if arg.name == "sort"
    ));
}

#[test]
fn service_answers_the_same_over_a_snapshot() {
    let conn = open_sample_db_in_memory().unwrap();
    let sqlite = CustomerService::new(SqliteCustomerRepository::try_new(&conn).unwrap());
    let memory = CustomerService::new(
        InMemoryCustomerRepository::snapshot_of(sqlite.repository()).unwrap(),
    );
    let filter = mar_in_long_cities();

    assert_eq!(memory.repository().len(), 599);
    assert_eq!(
        sqlite.search_page(&filter, 0, 2, Some("email")).unwrap(),
        memory.search_page(&filter, 0, 2, Some("email")).unwrap()
    );
    assert_eq!(
        sqlite.page(1, 5, Some("lastName,desc")).unwrap(),
        memory.page(1, 5, Some("lastName,desc")).unwrap()
    );
    assert_eq!(
        sqlite.get_by_email("MARVIN.YEE@sakilacustomer.org").unwrap(),
        memory.get_by_email("MARVIN.YEE@sakilacustomer.org").unwrap()
    );
}
