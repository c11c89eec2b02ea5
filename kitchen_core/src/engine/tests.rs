use super::*;
use crate::fallback::OfflineResolver;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Always gives the same answer.
struct FixedAnswer(Option<ResultDescriptor>);

impl FallbackResolver for FixedAnswer {
    async fn resolve(&self, _items: &[Item], _method: CookingMethod) -> Option<ResultDescriptor> {
        self.0.clone()
    }
}

/// Never answers within any reasonable time.
struct StalledAnswer;

impl FallbackResolver for StalledAnswer {
    async fn resolve(&self, _items: &[Item], _method: CookingMethod) -> Option<ResultDescriptor> {
        tokio::time::sleep(Duration::from_secs(86_400)).await;
        None
    }
}

fn id(raw: &str) -> ItemId {
    ItemId::from(raw)
}

fn stage_all(engine: &mut ResolutionEngine, ids: &[&str]) {
    for raw in ids {
        engine.stage(&id(raw)).unwrap();
    }
}

async fn cook(
    engine: &mut ResolutionEngine,
    ids: &[&str],
    method: CookingMethod,
) -> Result<Option<DiscoveryRecord>, EngineError> {
    engine.select_method(method).unwrap();
    stage_all(engine, ids);
    engine.attempt_resolution(&OfflineResolver, TIMEOUT).await
}

#[tokio::test]
async fn test_flour_and_water_make_dough() {
    let mut engine = ResolutionEngine::default();
    let before = engine.catalog().len();

    let record = cook(&mut engine, &["flour", "water"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.result.name, "Dough");
    assert_eq!(record.result.emoji, "🥟");
    assert_eq!(record.result.id, id("dough"));
    assert!(record.is_new_discovery);
    assert!(!record.is_custom);
    assert!(record.result.discovered_at.is_some());
    assert_eq!(record.ingredients, vec!["Flour", "Water"]);

    assert_eq!(engine.catalog().len(), before + 1);
    assert_eq!(engine.history().len(), 1);
    assert!(engine.selection().is_empty());
    assert_eq!(engine.status(), EngineStatus::Idle);
    assert_eq!(engine.last_discovery(), Some(&record));
}

#[tokio::test]
async fn test_second_dough_reuses_catalog_entry() {
    let mut engine = ResolutionEngine::default();
    let first = cook(&mut engine, &["flour", "water"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();
    let size = engine.catalog().len();

    let second = cook(&mut engine, &["water", "flour"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();

    assert!(!second.is_new_discovery);
    assert_eq!(second.result.id, first.result.id);
    assert_eq!(second.result.discovered_at, first.result.discovered_at);
    assert_eq!(engine.catalog().len(), size);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(second.ingredients, vec!["Water", "Flour"]);
}

#[tokio::test]
async fn test_boil_single_potato() {
    let mut engine = ResolutionEngine::default();
    engine.select_method(CookingMethod::Boil).unwrap();
    let full = engine.stage(&id("potato")).unwrap();
    assert!(!full);
    assert!(engine.can_resolve_directly());

    let record = engine
        .attempt_resolution(&OfflineResolver, TIMEOUT)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.result.name, "Boiled Potato");
    assert_eq!(record.result.emoji, "🥔");
    assert_eq!(record.method, CookingMethod::Boil);
}

#[tokio::test]
async fn test_matching_is_order_independent() {
    let mut a = ResolutionEngine::default();
    let mut b = ResolutionEngine::default();

    let ra = cook(&mut a, &["milk", "chocolate"], CookingMethod::Mix).await.unwrap().unwrap();
    let rb = cook(&mut b, &["chocolate", "milk"], CookingMethod::Mix).await.unwrap().unwrap();

    assert_eq!(ra.result.id, rb.result.id);
    assert_eq!(ra.result.name, "Hot Chocolate");
    assert_eq!(ra.is_new_discovery, rb.is_new_discovery);
    assert_eq!(ra.is_custom, rb.is_custom);
}

#[tokio::test]
async fn test_mix_with_one_item_fails_validation() {
    let mut engine = ResolutionEngine::default();
    let catalog = engine.catalog().clone();

    let err = cook(&mut engine, &["egg"], CookingMethod::Mix).await.unwrap_err();

    assert!(matches!(err, EngineError::Validation(ref msg) if msg == INSUFFICIENT_INPUTS_MESSAGE));
    assert!(err.is_user_facing());
    assert_eq!(engine.message(), Some(INSUFFICIENT_INPUTS_MESSAGE));
    assert_eq!(engine.catalog(), &catalog);
    assert!(engine.history().is_empty());
    assert_eq!(engine.status(), EngineStatus::Idle);
    assert_eq!(engine.selection().ids(), &[id("egg")]);
}

#[tokio::test]
async fn test_mix_needs_distinct_items() {
    let mut engine = ResolutionEngine::default();
    let err = cook(&mut engine, &["egg", "egg"], CookingMethod::Mix).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.history().is_empty());
}

#[tokio::test]
async fn test_empty_bowl_is_a_no_op() {
    let mut engine = ResolutionEngine::default();
    let outcome = engine.attempt_resolution(&OfflineResolver, TIMEOUT).await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(engine.status(), EngineStatus::Idle);
    assert!(engine.message().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failure_recovers_after_delay() {
    let mut engine = ResolutionEngine::default();

    let err = cook(&mut engine, &["salt", "sugar"], CookingMethod::Mix).await.unwrap_err();

    assert!(matches!(err, EngineError::ResolutionFailure(ref msg) if msg == STUMPED_MESSAGE));
    assert!(matches!(engine.status(), EngineStatus::Failure { .. }));
    assert_eq!(engine.message(), Some(STUMPED_MESSAGE));
    assert_eq!(engine.selection().ids(), &[id("salt"), id("sugar")]);
    assert!(engine.history().is_empty());

    tokio::time::advance(Duration::from_secs(4)).await;
    assert!(matches!(engine.status(), EngineStatus::Failure { .. }));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(engine.status(), EngineStatus::Idle);

    // The same bowl can be retried with another technique.
    engine.select_method(CookingMethod::Bake).unwrap();
    assert!(engine.attempt_resolution(&OfflineResolver, TIMEOUT).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_resolution_returns_to_idle() {
    let mut engine = ResolutionEngine::default();
    stage_all(&mut engine, &["salt", "sugar"]);

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        engine.attempt_resolution(&StalledAnswer, Duration::from_secs(7200)),
    )
    .await;
    assert!(outcome.is_err());

    assert_eq!(engine.status(), EngineStatus::Idle);
    assert!(engine.history().is_empty());
    assert_eq!(engine.selection().ids(), &[id("salt"), id("sugar")]);

    // The bowl is usable again straight away.
    engine.clear_selection().unwrap();
    engine.select_method(CookingMethod::Boil).unwrap();
    engine.stage(&id("potato")).unwrap();
    let record = engine
        .attempt_resolution(&OfflineResolver, TIMEOUT)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.result.name, "Boiled Potato");
}

#[tokio::test(start_paused = true)]
async fn test_custom_recovery_delay() {
    let mut engine = ResolutionEngine::default().with_recovery_delay(Duration::from_millis(100));
    let _ = cook(&mut engine, &["ice"], CookingMethod::Griddle).await;
    assert!(matches!(engine.status(), EngineStatus::Failure { .. }));

    tokio::time::advance(Duration::from_millis(100)).await;
    engine.settle();
    assert_eq!(engine.status(), EngineStatus::Idle);
}

#[tokio::test]
async fn test_fallback_result_is_materialized() {
    let mut engine = ResolutionEngine::default();
    let answer = ResultDescriptor::new("Salted Caramel", "🍮", "Sweet meets salty.")
        .with_source("https://example.com/caramel", "Caramel");

    engine.stage(&id("salt")).unwrap();
    engine.stage(&id("sugar")).unwrap();
    let record = engine
        .attempt_resolution(&FixedAnswer(Some(answer)), TIMEOUT)
        .await
        .unwrap()
        .unwrap();

    assert!(record.is_new_discovery);
    assert!(!record.is_custom);
    assert_eq!(record.result.id, id("salted_caramel"));
    assert_eq!(record.result.source_url.as_deref(), Some("https://example.com/caramel"));
    assert!(engine.catalog().contains(&id("salted_caramel")));
}

#[tokio::test]
async fn test_fallback_name_matches_existing_item_case_insensitively() {
    let mut engine = ResolutionEngine::default();
    cook(&mut engine, &["flour", "water"], CookingMethod::Mix).await.unwrap();
    let size = engine.catalog().len();

    engine.stage(&id("salt")).unwrap();
    engine.stage(&id("water")).unwrap();
    let answer = ResultDescriptor::new("DOUGH", "🫓", "Another take.");
    let record = engine
        .attempt_resolution(&FixedAnswer(Some(answer)), TIMEOUT)
        .await
        .unwrap()
        .unwrap();

    assert!(!record.is_new_discovery);
    assert_eq!(record.result.name, "Dough");
    assert_eq!(record.result.emoji, "🥟");
    assert_eq!(engine.catalog().len(), size);
}

#[tokio::test]
async fn test_two_salad_chains_converge() {
    let mut engine = ResolutionEngine::default();

    let first = cook(&mut engine, &["cucumber", "tomato"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();
    assert!(first.is_new_discovery);

    cook(&mut engine, &["tomato"], CookingMethod::Chop).await.unwrap();
    cook(&mut engine, &["onion"], CookingMethod::Chop).await.unwrap();
    let second = cook(&mut engine, &["diced_onion", "diced_tomato"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();

    assert!(!second.is_new_discovery);
    assert_eq!(second.result.id, first.result.id);
    assert_eq!(second.result.discovered_at, first.result.discovered_at);
    assert_eq!(second.result.description, first.result.description);
}

#[tokio::test]
async fn test_user_rule_result_is_custom() {
    let mut engine = ResolutionEngine::default();
    engine.stage(&id("salt")).unwrap();

    engine
        .add_rule(
            vec![id("salt"), id("sugar")],
            CookingMethod::Mix,
            ResultDescriptor::new("Sweet Salt", "🧂", "Confusing."),
        )
        .unwrap();
    assert!(engine.selection().is_empty());

    let record = cook(&mut engine, &["sugar", "salt"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();
    assert!(record.is_custom);
    assert!(record.result.is_custom);
    assert_eq!(record.result.name, "Sweet Salt");
}

#[tokio::test]
async fn test_builtin_rule_beats_user_rule() {
    let mut engine = ResolutionEngine::default();
    engine
        .add_rule(
            vec![id("flour"), id("water")],
            CookingMethod::Mix,
            ResultDescriptor::new("Glue", "🧴", "Not food."),
        )
        .unwrap();

    let record = cook(&mut engine, &["water", "flour"], CookingMethod::Mix)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.result.name, "Dough");
    assert!(!record.is_custom);
    assert_eq!(engine.rules().shadowed_user_rules(), vec![0]);
}

#[test]
fn test_staging_is_locked_while_resolving() {
    let mut engine = ResolutionEngine::default();
    stage_all(&mut engine, &["salt", "sugar"]);

    let pending = engine.begin_resolution().unwrap().unwrap();
    let Pending::NeedsFallback(request) = pending else {
        panic!("salt and sugar have no recipe");
    };
    assert_eq!(request.items.len(), 2);
    assert_eq!(request.method, CookingMethod::Mix);
    assert_eq!(engine.status(), EngineStatus::Resolving);

    assert!(matches!(engine.stage(&id("egg")), Err(EngineError::Busy)));
    assert!(matches!(engine.select_method(CookingMethod::Fry), Err(EngineError::Busy)));
    assert!(matches!(engine.clear_selection(), Err(EngineError::Busy)));
    assert!(matches!(engine.begin_resolution(), Err(EngineError::Busy)));

    let record = engine
        .complete_resolution(Some(ResultDescriptor::new("Brine", "🧂", "Salty.")))
        .unwrap();
    assert_eq!(record.ingredients, vec!["Salt", "Sugar"]);
    assert_eq!(engine.status(), EngineStatus::Idle);
    assert!(engine.stage(&id("egg")).is_ok());
}

#[test]
fn test_matched_recipe_is_pending_match() {
    let mut engine = ResolutionEngine::default();
    engine.select_method(CookingMethod::Fry).unwrap();
    engine.stage(&id("egg")).unwrap();

    let pending = engine.begin_resolution().unwrap().unwrap();
    assert!(matches!(pending, Pending::Matched(ref result) if result.name == "Fried Egg"));
}

#[test]
fn test_complete_without_begin() {
    let mut engine = ResolutionEngine::default();
    assert!(matches!(engine.complete_resolution(None), Err(EngineError::NotResolving)));
}

#[test]
fn test_stage_validation() {
    let mut engine = ResolutionEngine::default();
    assert!(matches!(engine.stage(&id("unobtainium")), Err(EngineError::UnknownItem(_))));

    assert!(!engine.stage(&id("flour")).unwrap());
    assert!(engine.stage(&id("water")).unwrap());
    assert!(matches!(engine.stage(&id("egg")), Err(EngineError::SelectionFull(2))));
}

#[tokio::test]
async fn test_clear_resets_failure() {
    let mut engine = ResolutionEngine::default();
    let _ = cook(&mut engine, &["salt", "sugar"], CookingMethod::Mix).await;
    assert!(engine.message().is_some());

    engine.clear_selection().unwrap();
    assert!(engine.selection().is_empty());
    assert_eq!(engine.status(), EngineStatus::Idle);
    assert!(engine.message().is_none());
}

#[test]
fn test_import_failure_sets_message() {
    let mut engine = ResolutionEngine::default();
    let err = engine.import_rules("{\"not\": \"an array\"}").unwrap_err();
    assert!(matches!(err, EngineError::Rule(kitchen_rules::RuleError::Format(_))));
    assert!(engine.message().is_some());
    assert!(engine.rules().user().is_empty());
}
