//! Unit tests for projecting cleaned data onto records


use serde_json::{json, Value};
use swamper_core::{
    CleanContext, CleanedData, Cleaner, CleanerConfig, CleanerError, FieldCleaners, FieldMapping,
    MapRecord, RecordError, Schema, Target, ValidationError,
};
use test_support::{data, person, Job, Kind, Model, Person};

/// Uses the records supplied to the cleaner
struct People;

impl Schema for People {
    type Record = Model;
    type Error = ValidationError;
}

/// Maps the record's `first_name` onto the `name` input
struct Renamed;

impl Schema for Renamed {
    type Record = Model;
    type Error = ValidationError;

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::from_pairs([("first_name", "name")])
    }

    fn field_cleaners(&self) -> FieldCleaners<Self> {
        FieldCleaners::new().register("name", |_, _, value, _| {
            Ok(json!(value.as_str().unwrap_or_default().trim()))
        })
    }
}

#[cfg(test)]
mod building {
    use super::*;

    #[test]
    fn test_build_creates_record_when_registry_is_empty() {
        let outcome = Cleaner::new(People, ["name", "age"], data(json!({"name": "Jane", "age": 31})))
            .unwrap()
            .full_clean()
            .unwrap();
        assert!(outcome.instances().is_empty());

        let built = outcome.build(Kind::Person, ["name", "age"]).unwrap();
        assert_eq!(
            built.person(),
            &Person {
                name: "Jane".to_string(),
                first_name: String::new(),
                age: 31,
            }
        );
    }

    #[test]
    fn test_build_reuses_registry_record() {
        let existing = Model::Person(Person {
            name: "Old".to_string(),
            first_name: "Kept".to_string(),
            age: 50,
        });

        let outcome = Cleaner::new(People, ["name"], data(json!({"name": "New"})))
            .unwrap()
            .with_instances(vec![existing])
            .full_clean()
            .unwrap();

        let built = outcome.build(Kind::Person, ["name"]).unwrap();
        assert_eq!(built.person().name, "New");
        assert_eq!(built.person().first_name, "Kept");
        assert_eq!(built.person().age, 50);

        // The registry copy is left alone
        assert_eq!(outcome.instances().get(Kind::Person).unwrap().person().name, "Old");
    }

    #[test]
    fn test_update_given_record() {
        let outcome = Cleaner::new(People, ["age"], data(json!({"age": 12})))
            .unwrap()
            .full_clean()
            .unwrap();

        let updated = outcome.update(person("swamper"), ["age"]).unwrap();
        assert_eq!(updated.person().name, "swamper");
        assert_eq!(updated.person().age, 12);
    }

    #[test]
    fn test_only_listed_fields_are_assigned() {
        let outcome = Cleaner::new(People, ["name", "age"], data(json!({"name": "Jane", "age": 31})))
            .unwrap()
            .full_clean()
            .unwrap();

        let updated = outcome.update(person("swamper"), ["age"]).unwrap();
        assert_eq!(updated.person().name, "swamper");
        assert_eq!(updated.person().age, 31);
    }

    #[test]
    fn test_fields_without_cleaned_value_are_skipped() {
        struct DropsAge;

        impl Schema for DropsAge {
            type Record = Model;
            type Error = ValidationError;

            fn clean(&self, ctx: &mut CleanContext<'_, Model>) -> anyhow::Result<Option<CleanedData>> {
                let mut cleaned = ctx.cleaned_data().clone();
                cleaned.remove("age");
                Ok(Some(cleaned))
            }
        }

        let outcome = Cleaner::new(DropsAge, ["name", "age"], data(json!({"name": "Jane", "age": 31})))
            .unwrap()
            .full_clean()
            .unwrap();

        let original = Model::Person(Person {
            age: 7,
            ..Person::default()
        });
        let updated = outcome.update(original, ["name", "age"]).unwrap();
        assert_eq!(updated.person().name, "Jane");
        assert_eq!(updated.person().age, 7);
    }

    #[test]
    fn test_map_record_accepts_any_field() {
        struct Loose;

        impl Schema for Loose {
            type Record = MapRecord;
            type Error = ValidationError;
        }

        let outcome = Cleaner::new(Loose, ["a", "b"], data(json!({"a": 1, "b": [2]})))
            .unwrap()
            .full_clean()
            .unwrap();

        let record = outcome.build((), ["a", "b"]).unwrap();
        assert_eq!(record.attributes.get("a"), Some(&json!(1)));
        assert_eq!(record.attributes.get("b"), Some(&json!([2])));
    }
}

#[cfg(test)]
mod mapping {
    use super::*;

    #[test]
    fn test_instance_side_names_resolve_to_data_values() {
        let outcome = Cleaner::new(Renamed, ["first_name"], data(json!({"name": "  Jane "})))
            .unwrap()
            .full_clean()
            .unwrap();
        assert_eq!(outcome.cleaned_data()["name"], json!("Jane"));

        let built = outcome.build(Kind::Person, ["first_name"]).unwrap();
        assert_eq!(built.person().first_name, "Jane");
        assert_eq!(built.person().name, "");
    }

    #[test]
    fn test_data_side_names_are_accepted() {
        let outcome = Cleaner::new(Renamed, ["first_name"], data(json!({"name": "Jane"})))
            .unwrap()
            .full_clean()
            .unwrap();

        let built = outcome.build(Kind::Person, ["name"]).unwrap();
        assert_eq!(built.person().first_name, "Jane");
        assert_eq!(built.person().name, "");
    }
}

#[cfg(test)]
mod failures {
    use super::*;

    struct AlwaysFails;

    impl Schema for AlwaysFails {
        type Record = Model;
        type Error = ValidationError;

        fn clean(&self, _ctx: &mut CleanContext<'_, Model>) -> anyhow::Result<Option<CleanedData>> {
            Err(ValidationError::new("Nope").into())
        }
    }

    #[test]
    fn test_build_with_errors_fails() {
        let outcome = Cleaner::new(AlwaysFails, ["name"], data(json!({"name": "Jane"})))
            .unwrap()
            .full_clean()
            .unwrap();

        let err = outcome.build(Kind::Person, ["name"]).unwrap_err();
        assert!(matches!(err, CleanerError::NotClean { error_count: 1 }));
        assert!(err.is_misuse());
    }

    #[test]
    fn test_undeclared_kind_is_rejected() {
        let outcome = Cleaner::new(People, ["name"], data(json!({"name": "Jane"})))
            .unwrap()
            .with_instances(vec![person("existing")])
            .full_clean()
            .unwrap();

        let err = outcome.build(Kind::Job, ["name"]).unwrap_err();
        assert!(matches!(err, CleanerError::UndeclaredInstanceKind { .. }));
        assert_eq!(err.to_string(), "Instance kind Job must be in the instance registry");

        let err = outcome
            .update(Model::Job(Job::default()), ["name"])
            .unwrap_err();
        assert!(matches!(err, CleanerError::UndeclaredInstanceKind { .. }));

        assert!(outcome.build(Kind::Person, ["name"]).is_ok());
    }

    #[test]
    fn test_assignment_type_mismatch() {
        let outcome = Cleaner::new(People, ["age"], data(json!({"age": "old"})))
            .unwrap()
            .full_clean()
            .unwrap();

        let err = outcome.build(Kind::Person, ["age"]).unwrap_err();
        match err {
            CleanerError::Record(RecordError::InvalidValue { field, .. }) => assert_eq!(field, "age"),
            other => panic!("expected an invalid value error, got {}", other),
        }
    }

    #[test]
    fn test_unknown_record_attribute() {
        let outcome = Cleaner::new(People, ["nickname"], data(json!({"nickname": "J"})))
            .unwrap()
            .full_clean()
            .unwrap();

        let err = outcome.build(Kind::Person, ["nickname"]).unwrap_err();
        assert!(matches!(
            err,
            CleanerError::Record(RecordError::UnknownAttribute { .. })
        ));
    }
}

#[cfg(test)]
mod json_fields {
    use super::*;

    struct RequiresName;

    impl Schema for RequiresName {
        type Record = Model;
        type Error = ValidationError;

        fn clean(&self, ctx: &mut CleanContext<'_, Model>) -> anyhow::Result<Option<CleanedData>> {
            if ctx.cleaned_data()["name"].is_null() {
                ctx.add_error("name", "Name is required")?;
            }
            Ok(None)
        }
    }

    #[test]
    fn test_build_from_json_field_list() {
        let outcome = Cleaner::new(People, ["name"], data(json!({"name": "Jane"})))
            .unwrap()
            .full_clean()
            .unwrap();

        let built = outcome
            .build_or_update_from_json(Target::Kind(Kind::Person), &json!(["name"]))
            .unwrap();
        assert_eq!(built.person().name, "Jane");

        let err = outcome
            .build_or_update_from_json(Target::Kind(Kind::Person), &json!("name"))
            .unwrap_err();
        assert!(matches!(err, CleanerError::InvalidFields { .. }));
    }

    #[test]
    fn test_build_from_json_field_list_without_verification() {
        let outcome = Cleaner::with_config(
            People,
            ["name"],
            data(json!({"name": "Jane"})),
            CleanerConfig::unverified(),
        )
        .unwrap()
        .full_clean()
        .unwrap();

        let built = outcome
            .build_or_update_from_json(Target::Kind(Kind::Person), &json!("name"))
            .unwrap();
        assert_eq!(built.person().name, "Jane");

        let built = outcome
            .build_or_update_from_json(Target::Kind(Kind::Person), &json!(["name", 4, null]))
            .unwrap();
        assert_eq!(built.person().name, "Jane");
    }

    #[test]
    fn test_into_result() {
        let cleaned = Cleaner::new(People, ["name"], data(json!({"name": "Jane"})))
            .unwrap()
            .full_clean()
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(cleaned.get("name"), Some(&Value::from("Jane")));

        let errors = Cleaner::new(RequiresName, ["name"], data(json!({})))
            .unwrap()
            .full_clean()
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(errors.message_count(), 1);
    }
}
