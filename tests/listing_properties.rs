use chrono::{Duration, NaiveDate};
use konsertliste::events::model::{Event, SortDirection};
use konsertliste::favorites::Favorites;
use konsertliste::listing::criteria::{DateRange, FilterCriteria, SortField};
use konsertliste::listing::filter::{filter_events, sort_events};
use konsertliste::slug::slugify;
use proptest::prelude::*;

const VENUES: [&str; 4] = ["Grieghallen", "USF Verftet", "Ole Bull Scene", "Kvarteret"];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn event(title: String, day: i64, venue: usize) -> Event {
    Event::new(
        title,
        (start() + Duration::days(day)).and_hms_opt(20, 0, 0).unwrap(),
        VENUES[venue].to_string(),
    )
}

fn events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(("[A-Za-zæøå ]{1,12}", 0i64..120, 0..VENUES.len()), 0..40)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(title, day, venue)| event(title, day, venue))
                .collect()
        })
}

/// Events on distinct days
fn dated_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::btree_set(0i64..10_000, 0..40).prop_map(|days| {
        days.into_iter()
            .enumerate()
            .map(|(i, day)| event(format!("Konsert {i}"), day, i % VENUES.len()))
            .collect()
    })
}

fn single_predicates(search: String, venue: usize, from: i64, length: i64) -> Vec<FilterCriteria> {
    let range = DateRange::new(
        Some(start() + Duration::days(from)),
        Some(start() + Duration::days(from + length)),
    )
    .unwrap();

    vec![
        FilterCriteria::default().with_search(&search),
        FilterCriteria::default().with_venue(VENUES[venue]),
        FilterCriteria::default().with_date_range(range),
        FilterCriteria::default().only_favorites(),
    ]
}

proptest! {
    #[test_log::test]
    fn predicates_should_commute(
        events in events(),
        search in "[a-zæøå]{0,2}",
        venue in 0..VENUES.len(),
        from in 0i64..120,
        length in 0i64..60,
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
    ) {
        let favorites: Favorites = events.iter().step_by(2).map(|e| e.title.clone()).collect();
        let predicates = single_predicates(search.clone(), venue, from, length);

        let combined = FilterCriteria {
            search,
            venues: predicates[1].venues.clone(),
            date_range: predicates[2].date_range,
            favorites_only: true,
            ..FilterCriteria::default()
        };

        let in_order = order
            .iter()
            .fold(events.clone(), |subset, &i| filter_events(&subset, &predicates[i], &favorites));

        prop_assert_eq!(in_order, filter_events(&events, &combined, &favorites));
    }

    #[test_log::test]
    fn descending_should_reverse_ascending(events in dated_events()) {
        let mut ascending = events.clone();
        let mut descending = events;

        sort_events(&mut ascending, SortField::Date, SortDirection::Asc);
        sort_events(&mut descending, SortField::Date, SortDirection::Desc);
        descending.reverse();

        prop_assert_eq!(ascending, descending);
    }

    #[test_log::test]
    fn slugs_should_be_deterministic_and_idempotent(text in "\\PC{0,40}") {
        let slug = slugify(&text);

        prop_assert_eq!(&slug, &slugify(&text));
        prop_assert_eq!(&slug, &slugify(&slug));
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-') && !slug.contains("--"));
    }

    #[test_log::test]
    fn toggling_a_favorite_twice_should_restore_the_set(
        titles in prop::collection::vec("[a-z]{1,6}", 0..10),
        title in "[a-z]{1,6}",
    ) {
        let mut favorites: Favorites = titles.into_iter().collect();
        let before = favorites.clone();

        favorites.toggle(&title);
        favorites.toggle(&title);

        let mut after_titles = favorites.titles().to_vec();
        let mut before_titles = before.titles().to_vec();
        after_titles.sort();
        before_titles.sort();

        prop_assert_eq!(after_titles, before_titles);
    }
}
