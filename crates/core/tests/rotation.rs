mod common;

use common::{check_consistency, full_config, generate};
use crawl_core::{
    Catalog, Dungeon, DungeonConfig, EntityFactory, Link, LinkPartner, Orientation, Pos,
    ScriptedRandom, Session, Size,
};
use proptest::prelude::*;

fn orientation() -> impl Strategy<Value = Orientation> {
    prop::sample::select(Orientation::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn four_quarter_turns_are_the_identity(seed in any::<u64>(), turn in orientation()) {
        let mut dungeon = generate(&full_config(Size::new(27, 33)), seed)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        dungeon.place_player(dungeon.size().center(), &Catalog::default_player());
        let original = dungeon.clone();

        for _ in 0..4 {
            dungeon.rotate(turn);
            check_consistency(&dungeon).map_err(TestCaseError::fail)?;
        }

        prop_assert_eq!(dungeon.size(), original.size());
        prop_assert_eq!(dungeon.icons(), original.icons());
        prop_assert_eq!(dungeon.vision(), original.vision());
        prop_assert_eq!(dungeon.player_position(), original.player_position());
        for (key, entity) in original.entities() {
            let moved = dungeon.entity(key).map(|moved| moved.position);
            prop_assert_eq!(moved, Some(entity.position));
        }
    }

    #[test]
    fn session_rotation_keeps_partner_exits_on_the_doors(
        seed in any::<u64>(),
        turn in orientation(),
    ) {
        let mut config = full_config(Size::new(25, 21));
        config.generate.enemies = false;
        let mut session = Session::new(config, seed)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        session.rotate_dungeon(0, turn).map_err(|error| TestCaseError::fail(error.to_string()))?;

        let first = &session.dungeons()[0];
        for (index, link) in first.links.iter().enumerate() {
            prop_assert_eq!(first.tile(link.entrance).icon(), '+');
            let partner = link.partner.ok_or_else(|| TestCaseError::fail("unresolved"))?;
            let reciprocal = session.dungeons()[partner.dungeon].links[partner.link];
            let back = reciprocal.partner.ok_or_else(|| TestCaseError::fail("one-sided"))?;
            prop_assert_eq!((back.dungeon, back.link), (0, index));
            prop_assert_eq!(back.exit, link.entrance);
        }
    }
}

#[test]
fn three_by_two_link_example() {
    let catalog = Catalog::standard();
    let factory = EntityFactory::new(&catalog);
    let player = Catalog::default_player();
    let icons = ['#', '#', '#', '+', '-', '#'];
    let mut small = Dungeon::from_icons(Size::new(3, 2), &icons, &factory, &player).expect("grid");
    let rows = "#####\n#---+\n#####";
    let mut large = Dungeon::from_icon_rows(rows, &factory, &player).expect("grid");

    small.links.push(Link {
        entrance: Pos::new(0, 1),
        partner: Some(LinkPartner { dungeon: 1, link: 0, exit: Pos::new(4, 1) }),
    });
    large.links.push(Link {
        entrance: Pos::new(4, 1),
        partner: Some(LinkPartner { dungeon: 0, link: 0, exit: Pos::new(0, 1) }),
    });

    let mut session = Session::from_dungeons(
        DungeonConfig::empty(Size::new(3, 2)),
        catalog,
        Box::new(ScriptedRandom::default()),
        vec![small, large],
        0,
    );
    session.rotate_dungeon(0, Orientation::East).expect("rotate");

    let small = &session.dungeons()[0];
    assert_eq!(small.size(), Size::new(2, 3));
    assert_eq!(small.links[0].entrance, Pos::new(0, 0));
    assert_eq!(small.tile(Pos::new(0, 0)).icon(), '+');
    assert_eq!(small.icon_rows(), vec!["+#", "-#", "##"]);
    let large = &session.dungeons()[1];
    assert_eq!(large.links[0].partner.map(|back| back.exit), Some(Pos::new(0, 0)));
}
