use ply_graph::{Entity, GroupIndex, Relation, Side};

fn board() -> Vec<Entity> {
    vec![
        Entity::new("e4").with_groups(0, 0),
        Entity::new("d4").with_groups(0, 1),
        Entity::new("f3").with_groups(0, 0),
        Entity::new("c6").with_groups(1, 0),
        Entity::new("b8").with_groups(1, 0),
        Entity::new("a1"),
    ]
}

#[test]
fn group_index_build_returns_empty_maps_for_empty_input() {
    let index = GroupIndex::build(&[]);
    assert!(index.is_empty());
    assert_eq!(index.outer_len(), 0);
    assert_eq!(index.innermost_groups().count(), 0);
}

#[test]
fn group_index_build_defaults_missing_ids_to_zero() {
    let entities = vec![Entity::new("a"), Entity::new("b")];
    let index = GroupIndex::build(&entities);
    assert_eq!(index.outer_len(), 1);
    assert_eq!(index.inner(0, 0).map(|g| g.len()), Some(2));
}

#[test]
fn group_index_build_nests_communities_under_components() {
    let entities = board();
    let index = GroupIndex::build(&entities);

    assert_eq!(
        index.outer_groups().map(|g| g.id).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(index.outer(0).map(|g| g.len()), Some(4));
    assert_eq!(index.inner_len(0), 2);
    assert_eq!(index.inner_len(1), 1);

    let partition = index.partition(&entities);
    assert_eq!(partition[&(0, 0)], vec!["a1", "e4", "f3"]);
    assert_eq!(partition[&(0, 1)], vec!["d4"]);
    assert_eq!(partition[&(1, 0)], vec!["b8", "c6"]);
}

#[test]
fn group_index_build_is_independent_of_entity_order() {
    let entities = board();
    let mut reversed = entities.clone();
    reversed.reverse();
    let mut rotated = entities.clone();
    rotated.rotate_left(2);

    let expected = GroupIndex::build(&entities).partition(&entities);
    assert_eq!(GroupIndex::build(&reversed).partition(&reversed), expected);
    assert_eq!(GroupIndex::build(&rotated).partition(&rotated), expected);
}

#[test]
fn group_index_build_filtered_keeps_indices_into_full_slice() {
    let mut entities = board();
    entities.push(Entity::new("h8").inactive(Side::Black));
    let index = GroupIndex::build_filtered(&entities, |e| e.is_active());

    let members = index.outer(0).map(|g| g.members.clone()).unwrap_or_default();
    assert!(!members.contains(&6));
    assert_eq!(
        members
            .iter()
            .map(|&i| entities[i].id.as_str())
            .collect::<Vec<_>>(),
        vec!["a1", "d4", "e4", "f3"]
    );
}

#[test]
fn group_index_outer_stats_reports_degrees_and_density() {
    let entities = board();
    let relations = vec![
        Relation::new("e4", "f3"),
        Relation::new("f3", "e4"),
        Relation::new("e4", "c6"),
        Relation::new("c6", "b8"),
        Relation::new("ghost", "e4"),
        Relation::new("e4", "e4"),
    ];
    let index = GroupIndex::build(&entities);
    let stats = index.outer_stats(&entities, &relations);

    let g0 = stats[&0];
    assert_eq!(g0.size, 4);
    assert_eq!(g0.internal_relations, 2);
    // e4 has two outgoing relations and f3 one; e4 and f3 receive one each.
    assert!((g0.mean_out_degree - 0.75).abs() < 1e-12);
    assert!((g0.mean_in_degree - 0.5).abs() < 1e-12);
    assert!((g0.density - 2.0 / 12.0).abs() < 1e-12);

    let g1 = stats[&1];
    assert_eq!(g1.internal_relations, 1);
    assert!((g1.density - 0.5).abs() < 1e-12);
}
