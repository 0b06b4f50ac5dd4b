use riftswitch::launcher::spawner::launch_product_args;
use riftswitch::models::account::GameKind;

#[test]
fn product_args_select_the_right_title() {
    assert_eq!(
        launch_product_args(GameKind::League),
        [
            "--launch-product=league_of_legends",
            "--launch-patchline=live"
        ]
    );
    assert_eq!(
        launch_product_args(GameKind::Valorant),
        ["--launch-product=valorant", "--launch-patchline=live"]
    );
}

#[test]
fn every_kind_launches_the_live_patchline() {
    for kind in GameKind::ALL {
        let args = launch_product_args(kind);
        assert!(args[0].starts_with("--launch-product="));
        assert_eq!(args[1], "--launch-patchline=live");
    }
}
