use sakila_core::{
    open_sample_db_in_memory, CustomerField, CustomerRepository, Direction,
    InMemoryCustomerRepository, Order, PageRequest, Predicate, Sort, SqliteCustomerRepository,
};
use std::collections::HashSet;
use std::thread;

fn predicates() -> Vec<Predicate> {
    vec![
        Predicate::always(),
        Predicate::any(Vec::<Predicate>::new()),
        CustomerField::FirstName
            .starts_with_ignore_case("Mar")
            .and(CustomerField::CityName.length().gt(10)),
        CustomerField::LastName.starts_with("W"),
        CustomerField::LastName.ends_with("SON"),
        CustomerField::LastName.ends_with_ignore_case("son"),
        CustomerField::Email.contains_ignore_case("ann"),
        CustomerField::Email.ends_with(""),
        CustomerField::CityName.contains(" "),
        CustomerField::Country.eq("Japan"),
        CustomerField::Id.ge(100).and(CustomerField::Id.lt(120)),
        CustomerField::Active.eq(false).or(CustomerField::FirstName.eq("CAROLYN")),
        CustomerField::LastName
            .length()
            .le(4)
            .or(CustomerField::FirstName.length().ge(9))
            .not(),
        CustomerField::District
            .eq("Texas")
            .and(CustomerField::PostalCode.gt("50000"))
            .or(CustomerField::Phone.starts_with("9")),
        Predicate::all([
            CustomerField::AddressLine.contains("Street"),
            CustomerField::FirstName.ne("MARY"),
            CustomerField::LastName.length().ne(5),
        ]),
    ]
}

fn sorts() -> Vec<Sort> {
    vec![
        Sort::unsorted(),
        Sort::by(Order::desc(CustomerField::LastName)),
        Sort::by(Order::asc(CustomerField::CityName)).and(Order::desc(CustomerField::FirstName)),
        Sort::by(Order::desc(CustomerField::Active)),
        Sort::by(Order::asc(CustomerField::Country)),
    ]
}

#[test]
fn in_memory_repository_matches_sqlite_for_predicates() {
    let conn = open_sample_db_in_memory().unwrap();
    let sqlite = SqliteCustomerRepository::try_new(&conn).unwrap();
    let memory = InMemoryCustomerRepository::snapshot_of(&sqlite).unwrap();
    assert_eq!(memory.len(), 599);

    for predicate in predicates() {
        assert_eq!(
            sqlite.find_all_matching(&predicate).unwrap(),
            memory.find_all_matching(&predicate).unwrap(),
            "predicate {predicate:?}"
        );
        assert_eq!(
            sqlite.count_matching(&predicate).unwrap(),
            memory.count_matching(&predicate).unwrap(),
            "predicate {predicate:?}"
        );
    }
}

#[test]
fn in_memory_repository_matches_sqlite_for_sorts_and_pages() {
    let conn = open_sample_db_in_memory().unwrap();
    let sqlite = SqliteCustomerRepository::try_new(&conn).unwrap();
    let memory = InMemoryCustomerRepository::snapshot_of(&sqlite).unwrap();

    for sort in sorts() {
        assert_eq!(
            sqlite.find_all_sorted(&sort).unwrap(),
            memory.find_all_sorted(&sort).unwrap(),
            "sort {sort:?}"
        );

        for (page, size) in [(0, 1), (1, 5), (7, 13), (59, 10), (200, 10)] {
            let request = PageRequest::new(page, size, sort.clone()).unwrap();
            assert_eq!(
                sqlite.find_all_paged(&request).unwrap(),
                memory.find_all_paged(&request).unwrap(),
                "sort {sort:?} page {page} size {size}"
            );

            let predicate = CustomerField::Active.eq(true);
            assert_eq!(
                sqlite.find_all_matching_paged(&predicate, &request).unwrap(),
                memory.find_all_matching_paged(&predicate, &request).unwrap(),
            );
        }
    }
}

#[test]
fn in_memory_repository_matches_sqlite_for_lookups_and_named_query() {
    let conn = open_sample_db_in_memory().unwrap();
    let sqlite = SqliteCustomerRepository::try_new(&conn).unwrap();
    let memory = InMemoryCustomerRepository::snapshot_of(&sqlite).unwrap();

    for id in [0, 1, 42, 599, 600] {
        assert_eq!(
            sqlite.find_by_id(id).unwrap(),
            memory.find_by_id(id).unwrap()
        );
    }
    for length in 0..12 {
        assert_eq!(
            sqlite.find_with_equal_length_names(length).unwrap(),
            memory.find_with_equal_length_names(length).unwrap()
        );
    }
    assert_eq!(
        sqlite
            .find_by_email("CAROLYN.PEREZ@sakilacustomer.org")
            .unwrap(),
        memory
            .find_by_email("CAROLYN.PEREZ@sakilacustomer.org")
            .unwrap()
    );
}

#[test]
fn snapshot_serves_concurrent_readers() {
    let conn = open_sample_db_in_memory().unwrap();
    let sqlite = SqliteCustomerRepository::try_new(&conn).unwrap();
    let memory = InMemoryCustomerRepository::snapshot_of(&sqlite).unwrap();
    let predicate = CustomerField::FirstName
        .starts_with_ignore_case("Mar")
        .and(CustomerField::CityName.length().gt(10));
    let request =
        PageRequest::new(1, 5, Sort::by_name(Direction::Desc, "lastName").unwrap()).unwrap();

    let memory = &memory;
    let predicate = &predicate;
    let request = &request;

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(move |_| {
                scope.spawn(move || {
                    let emails: HashSet<_> = memory
                        .find_all_matching(&predicate)
                        .unwrap()
                        .into_iter()
                        .map(|c| c.email)
                        .collect();
                    let page = memory.find_all_paged(&request).unwrap();
                    (emails, page)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let (first_emails, first_page) = &results[0];
    assert_eq!(first_emails.len(), 5);
    assert_eq!(first_page.content[0].last_name, "WREN");
    assert!(results
        .iter()
        .all(|(emails, page)| emails == first_emails && page == first_page));
}
