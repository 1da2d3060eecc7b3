//! Integration tests for `SqliteStore` against an in-memory database.

use cinedex_core::{
  movie::DirectorIds,
  person::{PersonName, Role},
  store::{CatalogWriter, MovieCatalog, Page},
};

use crate::{Error, SqlValue, SqliteStore, Table};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn name(first: &str, last: &str) -> PersonName {
  PersonName::new(first, last).unwrap()
}

/// Insert a movie directed by `director` and cast with `actors`.
async fn seed_movie(
  s: &SqliteStore,
  title: &str,
  year: i32,
  director: (&str, &str),
  actors: &[(&str, &str)],
) -> i64 {
  let d = s
    .insert_person_if_not_exists(name(director.0, director.1))
    .await
    .unwrap();
  let movie = s
    .insert_or_update_movie(
      title.to_lowercase(),
      title.to_owned(),
      year,
      DirectorIds(vec![d.id]),
    )
    .await
    .unwrap();
  s.insert_association(movie.id, d.id, Role::Director).await.unwrap();
  for (first, last) in actors {
    let a = s.insert_person_if_not_exists(name(first, last)).await.unwrap();
    s.insert_association(movie.id, a.id, Role::Actor).await.unwrap();
  }
  movie.id
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_person_is_idempotent() {
  let s = store().await;

  let first = s.insert_person_if_not_exists(name("Jane", "Doe")).await.unwrap();
  assert!(first.inserted);

  let second = s.insert_person_if_not_exists(name("Jane", "Doe")).await.unwrap();
  assert!(!second.inserted);
  assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn person_identity_ignores_case_and_keeps_first_spelling() {
  let s = store().await;

  let first = s.insert_person_if_not_exists(name("John", "Smith")).await.unwrap();
  let again = s
    .insert_person_if_not_exists(name(" JOHN ", "smith"))
    .await
    .unwrap();
  assert_eq!(first.id, again.id);
  assert!(!again.inserted);

  let stored = s.person_name(first.id).await.unwrap();
  assert_eq!(stored.as_deref(), Some("John Smith"));
}

#[tokio::test]
async fn person_identity_folds_non_ascii_case() {
  let s = store().await;

  let first = s.insert_person_if_not_exists(name("Émile", "Zola")).await.unwrap();
  let lower = s.insert_person_if_not_exists(name("émile", "zola")).await.unwrap();
  let upper = s.insert_person_if_not_exists(name("ÉMILE", "ZOLA")).await.unwrap();
  assert_eq!(first.id, lower.id);
  assert_eq!(first.id, upper.id);
  assert!(!lower.inserted && !upper.inserted);

  let asa = s.insert_person_if_not_exists(name("åsa", "berg")).await.unwrap();
  let asa_again = s.insert_person_if_not_exists(name("Åsa", "Berg")).await.unwrap();
  assert_eq!(asa.id, asa_again.id);

  assert_eq!(s.query(Table::Person, &["person_id"], &[]).await.unwrap().len(), 2);
  let stored = s.person_name(first.id).await.unwrap();
  assert_eq!(stored.as_deref(), Some("Émile Zola"));
}

// ─── Movies ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_or_update_movie_is_unique_on_triple() {
  let s = store().await;

  let a = s
    .insert_or_update_movie("heat".into(), "Heat".into(), 1995, DirectorIds(vec![1]))
    .await
    .unwrap();
  assert!(a.inserted);

  let b = s
    .insert_or_update_movie("heat".into(), "Heat".into(), 1995, DirectorIds(vec![1]))
    .await
    .unwrap();
  assert!(!b.inserted);
  assert_eq!(a.id, b.id);

  // Same title and year with different directors is a different movie.
  let c = s
    .insert_or_update_movie("heat".into(), "Heat".into(), 1995, DirectorIds(vec![2]))
    .await
    .unwrap();
  assert!(c.inserted);
  assert_ne!(a.id, c.id);
}

#[tokio::test]
async fn empty_director_list_is_rejected_by_schema() {
  let s = store().await;
  let result = s
    .insert_or_update_movie("orphan".into(), "Orphan".into(), 2001, DirectorIds::default())
    .await;
  assert!(matches!(result, Err(Error::Database(_))));
}

// ─── Sweep ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sweep_removes_movies_with_fewer_than_two_actors() {
  let s = store().await;

  let keep = seed_movie(&s, "Keep", 2000, ("Ann", "Lee"), &[("A", "One"), ("B", "Two")]).await;
  let one = seed_movie(&s, "Solo", 2001, ("Ann", "Lee"), &[("A", "One")]).await;
  let none = seed_movie(&s, "Empty", 2002, ("Bob", "Ray"), &[]).await;

  let outcome = s.sweep_undercast_movies(2).await.unwrap();
  assert_eq!(outcome.movies_deleted, 2);
  // Solo: director + actor; Empty: director only.
  assert_eq!(outcome.associations_deleted, 3);

  assert!(s.get_movie(keep).await.unwrap().is_some());
  assert!(s.get_movie(one).await.unwrap().is_none());
  assert!(s.get_movie(none).await.unwrap().is_none());

  let orphans = s
    .query(
      Table::MoviePerson,
      &["movie_person_id"],
      &[("movie_id", SqlValue::Integer(one))],
    )
    .await
    .unwrap();
  assert!(orphans.is_empty());

  // Persons are never pruned.
  let people = s.query(Table::Person, &[], &[]).await.unwrap();
  assert_eq!(people.len(), 4);
}

#[tokio::test]
async fn sweep_on_clean_store_is_a_no_op() {
  let s = store().await;
  seed_movie(&s, "Keep", 2000, ("Ann", "Lee"), &[("A", "One"), ("B", "Two")]).await;
  let outcome = s.sweep_undercast_movies(2).await.unwrap();
  assert_eq!(outcome.movies_deleted, 0);
  assert_eq!(outcome.associations_deleted, 0);
}

// ─── Reset & generic query ───────────────────────────────────────────────────

#[tokio::test]
async fn reset_clears_everything_and_restarts_ids() {
  let s = store().await;
  seed_movie(&s, "Keep", 2000, ("Ann", "Lee"), &[("A", "One"), ("B", "Two")]).await;

  s.reset().await.unwrap();
  assert!(s.query(Table::Movie, &[], &[]).await.unwrap().is_empty());
  assert!(s.query(Table::Person, &[], &[]).await.unwrap().is_empty());
  assert!(s.query(Table::MoviePerson, &[], &[]).await.unwrap().is_empty());

  let fresh = s.insert_person_if_not_exists(name("Zed", "Zulu")).await.unwrap();
  assert_eq!(fresh.id, 1);
}

#[tokio::test]
async fn query_projects_and_filters() {
  let s = store().await;
  let movie = seed_movie(&s, "Heat", 1995, ("Michael", "Mann"), &[("Al", "Pacino")]).await;

  let rows = s
    .query(
      Table::Movie,
      &["display_title", "year", "director_ids"],
      &[("movie_id", SqlValue::Integer(movie))],
    )
    .await
    .unwrap();
  assert_eq!(
    rows,
    vec![vec![
      SqlValue::Text("Heat".into()),
      SqlValue::Integer(1995),
      SqlValue::Text("1".into()),
    ]]
  );

  let actors = s
    .query(
      Table::MoviePerson,
      &["person_id"],
      &[("role", SqlValue::Text("a".into()))],
    )
    .await
    .unwrap();
  assert_eq!(actors.len(), 1);
}

#[tokio::test]
async fn query_rejects_unknown_columns() {
  let s = store().await;
  let err = s
    .query(Table::Person, &["first_name; DROP TABLE person"], &[])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnknownColumn { table: "person", .. }));
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_and_search_movies_are_ordered_and_paginated() {
  let s = store().await;
  seed_movie(&s, "Heat", 1995, ("Michael", "Mann"), &[]).await;
  seed_movie(&s, "Alien", 1979, ("Ridley", "Scott"), &[]).await;
  seed_movie(&s, "Heat", 1986, ("Dick", "Richards"), &[]).await;

  let all = s.list_movies(Page::default()).await.unwrap();
  let titles: Vec<_> = all.iter().map(|m| (m.title.as_str(), m.year)).collect();
  assert_eq!(titles, vec![("Alien", 1979), ("Heat", 1986), ("Heat", 1995)]);

  let page = s.list_movies(Page::new(1, 1)).await.unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].year, 1986);

  let heat = s.search_movies("HE".into(), Page::default()).await.unwrap();
  assert_eq!(heat.len(), 2);
  assert_eq!(heat[0].directors[0].last_name, "Richards");

  // Wildcards in user input match literally.
  let none = s.search_movies("%".into(), Page::default()).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn people_listings_are_split_by_role() {
  let s = store().await;
  seed_movie(&s, "Heat", 1995, ("Michael", "Mann"), &[("Al", "Pacino"), ("Val", "Kilmer")])
    .await;

  let directors = s.list_directors(Page::default()).await.unwrap();
  assert_eq!(directors.len(), 1);
  assert_eq!(directors[0].full_name(), "Michael Mann");

  let actors = s.list_actors(Page::default()).await.unwrap();
  let names: Vec<_> = actors.iter().map(|p| p.full_name()).collect();
  assert_eq!(names, vec!["Al Pacino", "Val Kilmer"]);
}

#[tokio::test]
async fn person_search_rules() {
  let s = store().await;
  seed_movie(
    &s,
    "Heat",
    1995,
    ("Michael", "Mann"),
    &[("Al", "Pacino"), ("Val", "Kilmer"), ("Mary Ann", "Smith")],
  )
  .await;

  // One word: first- or last-name prefix.
  let hits = s.search_actors("pac".into(), Page::default()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].last_name, "Pacino");

  // Two words: first-name prefix + last-name prefix.
  let hits = s.search_actors("val kil".into(), Page::default()).await.unwrap();
  assert_eq!(hits.len(), 1);

  // Whole input as a first-name prefix.
  let hits = s.search_actors("Mary Ann".into(), Page::default()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].last_name, "Smith");

  // Role restriction: the director is not an actor.
  assert!(s.search_actors("Michael".into(), Page::default()).await.unwrap().is_empty());
  assert_eq!(s.search_directors("mann".into(), Page::default()).await.unwrap().len(), 1);

  // Non-ASCII input matches regardless of case.
  seed_movie(&s, "Élan", 2001, ("Åsa", "Berg"), &[("Émile", "Zola")]).await;
  let hits = s.search_actors("ÉMI".into(), Page::default()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].first_name, "Émile");
  assert_eq!(s.search_directors("åsa b".into(), Page::default()).await.unwrap().len(), 1);

  // Blank input yields nothing.
  assert!(s.search_actors("   ".into(), Page::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn movie_person_lookups() {
  let s = store().await;
  let heat = seed_movie(&s, "Heat", 1995, ("Michael", "Mann"), &[("Al", "Pacino")]).await;
  seed_movie(&s, "Collateral", 2004, ("Michael", "Mann"), &[("Tom", "Cruise")]).await;

  let cast = s.actors_in_movie(heat, Page::default()).await.unwrap();
  assert_eq!(cast.len(), 1);
  let pacino = cast[0].person_id;

  let films = s.movies_with_actor(pacino, Page::default()).await.unwrap();
  assert_eq!(films.len(), 1);
  assert_eq!(films[0].movie_id, heat);

  let mann = s.list_directors(Page::default()).await.unwrap()[0].person_id;
  let by_mann = s.movies_by_director(mann, Page::default()).await.unwrap();
  let titles: Vec<_> = by_mann.iter().map(|m| m.title.as_str()).collect();
  assert_eq!(titles, vec!["Collateral", "Heat"]);
}

#[tokio::test]
async fn full_title_and_director_order() {
  let s = store().await;
  let joel = s.insert_person_if_not_exists(name("Joel", "Coen")).await.unwrap();
  let ethan = s.insert_person_if_not_exists(name("Ethan", "Coen")).await.unwrap();
  let movie = s
    .insert_or_update_movie(
      "fargo".into(),
      "Fargo".into(),
      1996,
      DirectorIds(vec![joel.id, ethan.id]),
    )
    .await
    .unwrap();

  let title = s.movie_full_title(movie.id).await.unwrap();
  assert_eq!(title.as_deref(), Some("Fargo (1996) by Joel Coen & Ethan Coen"));

  // Stored order wins over insertion order; ids without a person are skipped.
  let fink = s
    .insert_or_update_movie(
      "barton fink".into(),
      "Barton Fink".into(),
      1991,
      DirectorIds(vec![ethan.id, 999, joel.id]),
    )
    .await
    .unwrap();
  let fink = s.get_movie(fink.id).await.unwrap().unwrap();
  let names: Vec<_> = fink.directors.iter().map(|p| p.first_name.as_str()).collect();
  assert_eq!(names, vec!["Ethan", "Joel"]);

  assert!(s.movie_full_title(12345).await.unwrap().is_none());
  assert!(s.person_name(12345).await.unwrap().is_none());
}

#[tokio::test]
async fn corrupted_director_list_is_a_core_error() {
  let s = store().await;
  let heat = seed_movie(&s, "Heat", 1995, ("Michael", "Mann"), &[("Al", "Pacino")]).await;
  s.conn
    .call(|conn| {
      conn.execute("UPDATE movie SET director_ids = '1:x'", [])?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.get_movie(heat).await.unwrap_err();
  assert!(matches!(err, Error::Core(_)), "{err}");
  assert!(s.list_movies(Page::default()).await.is_err());
}
