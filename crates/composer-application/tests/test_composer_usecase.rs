use composer_application::ComposerUseCase;
use composer_core::config::ComposerConfig;
use composer_core::message::AgentType;
use composer_infrastructure::ValidationKind;

fn usecase() -> ComposerUseCase {
    ComposerUseCase::new(&ComposerConfig::default().without_delays())
}

#[tokio::test]
async fn test_submit_writes_generated_files() {
    let composer = usecase();
    let added = composer.submit("I need a shop with analytics").await;
    assert_eq!(added.len(), 4);
    assert_eq!(added[3].agent_type(), Some(AgentType::CodeGeneration));

    let fs = &composer.tools().filesystem;
    for path in [
        "src/components/ProductCard.tsx",
        "src/components/ShoppingCart.tsx",
        "src/components/MetricsCard.tsx",
        "src/components/AnalyticsChart.tsx",
        "src/pages/index.tsx",
        "src/pages/products/[id].tsx",
        "package.json",
    ] {
        assert!(fs.exists(path).await.data.unwrap().exists, "{path} missing");
    }

    let spec = composer.specification().await.unwrap();
    assert_eq!(spec.pages.len(), 2);
    assert_eq!(spec.pages[0].name, "Shop");
}

#[tokio::test]
async fn test_submit_returns_only_new_messages() {
    let composer = usecase();
    composer.submit("todo").await;
    let added = composer.submit("dashboard").await;
    assert_eq!(added.len(), 4);
    assert_eq!(added[0].content, "dashboard");
    assert_eq!(composer.history().await.len(), 8);
}

#[tokio::test]
async fn test_generated_component_can_be_analyzed_and_validated() {
    let composer = usecase();
    composer.submit("a task board").await;

    let analysis = composer
        .analyze_file("src/components/TaskList.tsx")
        .await
        .unwrap();
    assert_eq!(analysis.metrics.component_name.as_deref(), Some("TaskList"));
    assert_eq!(analysis.metrics.hooks, vec!["useState"]);

    let report = composer
        .validate_file(ValidationKind::Code, "src/components/TaskList.tsx")
        .await
        .unwrap();
    assert!(report.valid, "{:?}", report.errors);

    assert!(composer.analyze_file("src/missing.tsx").await.is_err());
}

#[tokio::test]
async fn test_reset_keeps_files() {
    let composer = usecase();
    composer.submit("todo").await;
    composer.ask("hello", None).await.unwrap();

    composer.reset().await;
    assert!(composer.history().await.is_empty());
    assert!(composer.specification().await.is_none());
    assert!(composer.sdk().history().await.is_empty());
    assert!(
        composer
            .tools()
            .filesystem
            .exists("src/components/TaskList.tsx")
            .await
            .data
            .unwrap()
            .exists
    );
}
