use reflex::{Model, Options, PathPolicy, Record, ReflexError, Value};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Name {
    first: String,
    last: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Member {
    name: Name,
    plays: String,
}

#[derive(Debug, Default, Record)]
struct Band {
    band: String,
    member: Vec<Member>,
}

fn strict() -> Options {
    Options::default().with_policy(PathPolicy::Strict)
}

#[test]
fn test_strict_reports_unmatched_segment() {
    let mut band = Band::default();
    let mut model = Model::with_options(&mut band, strict());

    let err = model.set("bnad", "Led Zeppelin".to_string()).unwrap_err();
    assert_eq!(err, ReflexError::unresolved_path("bnad", "bnad"));
    assert_eq!(
        err.to_string(),
        "Unresolved segment `bnad` in path `bnad`"
    );
    drop(model);
    assert_eq!(band.band, "");
}

#[test]
fn test_strict_tail_addresses_fresh_element() {
    let mut band = Band::default();
    let mut model = Model::with_options(&mut band, strict());

    model.set("member.name.first", "Jimmy".to_string()).unwrap();
    let err = model.set("member.nmae.first", "Robert".to_string()).unwrap_err();
    assert_eq!(err, ReflexError::unresolved_path("member.nmae.first", "nmae"));
    drop(model);

    assert_eq!(band.member.len(), 1);
    assert_eq!(band.member[0].name.first, "Jimmy");
}

#[test]
fn test_strict_map_groups_by_first_segment() {
    let mut band = Band::default();
    let mut model = Model::with_options(&mut band, strict());
    model
        .map([
            ("member.name.first", Value::from("John")),
            ("member.name.last", Value::from("Bonham")),
            ("member.plays", Value::from("Drums")),
            ("band", Value::from("Led Zeppelin")),
        ])
        .unwrap();
    drop(model);

    assert_eq!(band.band, "Led Zeppelin");
    assert_eq!(
        band.member,
        [Member {
            name: Name {
                first: "John".to_string(),
                last: "Bonham".to_string(),
            },
            plays: "Drums".to_string(),
        }]
    );
}

#[test]
fn test_strict_map_rejects_unknown_key() {
    let mut band = Band::default();
    let mut model = Model::with_options(&mut band, strict());
    let err = model
        .map([
            ("band", Value::from("Led Zeppelin")),
            ("drummer", Value::from("John Bonham")),
        ])
        .unwrap_err();
    assert_eq!(err, ReflexError::unresolved_path("drummer", "drummer"));
    drop(model);

    assert_eq!(band.band, "");
}

#[test]
fn test_strict_reads_stop_at_collections() {
    let mut band = Band::default();
    let model = Model::with_options(&mut band, strict());

    assert!(model.get::<Vec<Member>>("member").is_ok());
    assert_eq!(
        model.get::<String>("member.plays").unwrap_err(),
        ReflexError::unresolved_path("member.plays", "plays")
    );
}

#[test]
fn test_strict_root_collection() {
    let mut names: Vec<Name> = Vec::new();
    let mut model = Model::with_options(&mut names, strict());
    model.set("first", "Jimmy".to_string()).unwrap();
    assert!(model.set("middle", "Patrick".to_string()).is_err());
    drop(model);

    assert_eq!(names.len(), 1);
    assert_eq!(names[0].first, "Jimmy");
}

#[test]
fn test_fresh_model_inherits_policy() {
    let mut band = Band::default();
    let model = Model::with_options(&mut band, strict());
    let mut fresh = model.fresh(model.resolve("member"));

    assert_eq!(fresh.options().policy, PathPolicy::Strict);
    assert!(fresh.set("plyas", "Bass".to_string()).is_err());
    fresh.set("plays", "Bass".to_string()).unwrap();
}
