use form_spec::{
    FieldValue, FormData, FormSchema, InputChange, PreviewSession, SubmitOutcome,
    render::{RenderStatus, build_render_payload, render_card, render_json_ui, render_text},
};

fn fixture(name: &str) -> &'static str {
    match name {
        "survey_form" => include_str!("../tests/fixtures/survey_form.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn survey() -> FormSchema {
    serde_json::from_str(fixture("survey_form")).expect("deserialize")
}

#[test]
fn render_text_lists_fields_and_options() {
    let schema = survey();
    let payload = build_render_payload(&schema, &FormData::new(), &Default::default());

    assert_eq!(payload.status, RenderStatus::Ready);
    assert_eq!(payload.progress.total, 6);
    assert_eq!(payload.progress.filled, 0);

    let text = render_text(&payload);
    assert!(text.contains("Form: Team Survey"));
    assert!(text.contains(" - score [number] Score *"));
    assert!(text.contains("[ ] Tooling (tooling)"));
    // blank label falls back to the name
    assert!(text.contains(" - notes [textarea] notes (Anything else?)"));
}

#[test]
fn render_json_ui_exposes_widgets_and_errors() {
    let schema = survey();
    let mut session = PreviewSession::new();
    session.change(&schema, "score", InputChange::Set("42".into()));
    let outcome = session.submit(&schema);
    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));

    let ui = render_json_ui(&session.render(&schema));
    assert_eq!(ui["status"], "invalid");
    let fields = ui["fields"].as_array().expect("fields array");
    let score = fields.iter().find(|f| f["name"] == "score").expect("score");
    assert_eq!(score["widget"], "input");
    assert_eq!(score["error"], "Maximum value is 10");
    let topics = fields.iter().find(|f| f["name"] == "topics").expect("topics");
    assert_eq!(topics["widget"], "checkbox_group");
    assert_eq!(topics["error"], "Topics is required");
    assert_eq!(topics["options"].as_array().map(Vec::len), Some(3));
    let notes = fields.iter().find(|f| f["name"] == "notes").expect("notes");
    assert_eq!(notes["rows"], 4);
}

#[test]
fn render_card_maps_choice_widgets() {
    let schema = survey();
    let payload = build_render_payload(&schema, &FormData::new(), &Default::default());

    let card = render_card(&payload);
    assert_eq!(card["version"], "1.3");
    let actions = card["actions"].as_array().expect("actions");
    assert_eq!(actions[0]["type"], "Action.Submit");
    assert_eq!(actions[0]["data"]["form"]["mode"], "submit");

    let inputs = card["body"]
        .as_array()
        .expect("body")
        .iter()
        .filter(|item| item["type"] == "Container")
        .flat_map(|container| container["items"].as_array().cloned().unwrap_or_default())
        .filter(|item| item["type"].as_str().is_some_and(|ty| ty.starts_with("Input.")))
        .collect::<Vec<_>>();
    let topics = inputs.iter().find(|i| i["id"] == "topics").expect("topics");
    assert_eq!(topics["type"], "Input.ChoiceSet");
    assert_eq!(topics["isMultiSelect"], true);
    let mood = inputs.iter().find(|i| i["id"] == "mood").expect("mood");
    assert_eq!(mood["style"], "expanded");
    let anonymous = inputs
        .iter()
        .find(|i| i["id"] == "anonymous")
        .expect("anonymous");
    assert_eq!(anonymous["type"], "Input.Toggle");
}

#[test]
fn checkbox_group_toggles_accumulate_in_order() {
    let schema = survey();
    let mut session = PreviewSession::new();
    for option in ["process", "tooling"] {
        session.change(
            &schema,
            "topics",
            InputChange::Toggle {
                option: option.into(),
                checked: true,
            },
        );
    }
    assert_eq!(
        session.data().get("topics"),
        Some(&FieldValue::List(vec!["process".into(), "tooling".into()]))
    );

    session.change(
        &schema,
        "topics",
        InputChange::Toggle {
            option: "process".into(),
            checked: false,
        },
    );
    assert_eq!(
        session.data().get("topics"),
        Some(&FieldValue::List(vec!["tooling".into()]))
    );
}

#[test]
fn submit_accepts_complete_data() {
    let schema = survey();
    let mut session = PreviewSession::new();
    session.change(&schema, "score", InputChange::Set("7".into()));
    session.change(
        &schema,
        "topics",
        InputChange::Toggle {
            option: "hiring".into(),
            checked: true,
        },
    );
    match session.submit(&schema) {
        SubmitOutcome::Accepted(data) => {
            assert_eq!(data.get("score"), Some(&FieldValue::text("7")));
        }
        SubmitOutcome::Rejected(errors) => panic!("unexpected errors: {:?}", errors),
    }
    assert!(session.is_submitted());
}

#[test]
fn empty_form_renders_placeholder() {
    let payload = build_render_payload(&FormSchema::default(), &FormData::new(), &Default::default());
    assert_eq!(payload.status, RenderStatus::Empty);
    assert!(render_text(&payload).contains("No fields to preview."));
    assert!(render_card(&payload)["actions"].as_array().is_some_and(Vec::is_empty));
}
