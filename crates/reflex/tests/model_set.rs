use reflex::{Kind, Model, Record, ReflexError};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Name {
    first: String,
    last: String,
}

#[derive(Debug, Default, Record)]
struct Person {
    name: Name,
    location: String,
    tags: Vec<String>,
}

#[test]
fn test_build_mirrors_record_shape() {
    let mut person = Person::default();
    let model = Model::build(&mut person);
    let root = model.root();

    assert_eq!(root.name(), "");
    assert_eq!(root.kind(), Kind::Record);
    let names: Vec<&str> = root.children().map(|child| child.name()).collect();
    assert_eq!(names, ["name", "location", "tags"]);
    assert_eq!(model.resolve("name").kind(), Kind::Record);
    assert_eq!(model.resolve("name.first").kind(), Kind::Scalar);
    assert_eq!(model.resolve("tags").kind(), Kind::Collection);
}

#[test]
fn test_set_person() {
    let mut person = Person::default();
    let mut model = Model::build(&mut person);

    model.set("name.first", "Andrew".to_string()).unwrap();
    model.set("name.last", "Killmer".to_string()).unwrap();
    model.set("location", "Aiea, HI".to_string()).unwrap();
    drop(model);

    assert_eq!(
        person.name,
        Name {
            first: "Andrew".to_string(),
            last: "Killmer".to_string(),
        }
    );
    assert_eq!(person.location, "Aiea, HI");
}

#[test]
fn test_set_collection_of_scalars() {
    let mut person = Person::default();
    let mut model = Model::build(&mut person);

    model.set("tags", "a".to_string()).unwrap();
    model
        .set("tags", vec!["b".to_string(), "c".to_string()])
        .unwrap();
    model.set("tags", "d".to_string()).unwrap();
    drop(model);

    assert_eq!(person.tags, ["a", "b", "c", "d"]);
}

#[test]
fn test_unmatched_segments_are_skipped() {
    let mut person = Person::default();
    let mut model = Model::build(&mut person);

    // "nickname" names no field, so "name.nickname.first" lands on name.first.
    model.set("name.nickname.first", "Andy".to_string()).unwrap();
    assert!(std::ptr::eq(
        model.resolve("nothing.here"),
        model.root()
    ));
    drop(model);

    assert_eq!(person.name.first, "Andy");
}

#[test]
fn test_unmatched_path_targets_root() {
    let mut person = Person::default();
    let mut model = Model::build(&mut person);

    let err = model.set("nowhere", "x".to_string()).unwrap_err();
    assert!(matches!(err, ReflexError::TypeMismatch { ref path, .. } if path == "nowhere"));

    // The root itself can be replaced wholesale.
    model
        .set(
            "",
            Person {
                location: "Honolulu".to_string(),
                ..Person::default()
            },
        )
        .unwrap();
    drop(model);

    assert_eq!(person.location, "Honolulu");
}

#[test]
fn test_root_collection_appends() {
    let mut names: Vec<Name> = Vec::new();
    let mut model = Model::build(&mut names);

    model.set("first", "Jimmy".to_string()).unwrap();
    model.set("", Name::default()).unwrap();
    drop(model);

    assert_eq!(names.len(), 2);
    assert_eq!(names[0].first, "Jimmy");
    assert_eq!(names[1], Name::default());
}

#[test]
fn test_model_is_reusable_after_error() {
    let mut person = Person::default();
    let mut model = Model::build(&mut person);

    assert!(model.set("location", 1_u64).is_err());
    model.set("location", "Aiea, HI".to_string()).unwrap();
    assert_eq!(model.get::<String>("location").unwrap(), "Aiea, HI");
}
