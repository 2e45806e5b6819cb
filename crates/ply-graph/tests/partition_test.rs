use ply_graph::{
    Entity, GroupIndex, PartitionOptions, Relation, Side, assign_partition, compute_partition,
    modularity,
};

fn clique(prefix: &str, n: usize) -> (Vec<Entity>, Vec<Relation>) {
    let entities = (0..n)
        .map(|i| Entity::new(format!("{prefix}{i}")))
        .collect::<Vec<_>>();
    let mut relations = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            relations.push(Relation::new(format!("{prefix}{i}"), format!("{prefix}{j}")));
        }
    }
    (entities, relations)
}

fn two_cliques_with_bridge() -> (Vec<Entity>, Vec<Relation>) {
    let (mut entities, mut relations) = clique("a", 5);
    let (e2, r2) = clique("b", 5);
    entities.extend(e2);
    relations.extend(r2);
    relations.push(Relation::new("a0", "b0"));
    (entities, relations)
}

#[test]
fn compute_partition_finds_weak_components_largest_first() {
    let entities = vec![
        Entity::new("x"),
        Entity::new("p"),
        Entity::new("q"),
        Entity::new("r"),
        Entity::new("lonely"),
    ];
    let relations = vec![Relation::new("q", "p"), Relation::new("r", "q")];
    let partition = compute_partition(&entities, &relations, &PartitionOptions::default());

    assert_eq!(partition.component_count(), 3);
    assert_eq!(partition.component[1], Some(0));
    assert_eq!(partition.component[2], Some(0));
    assert_eq!(partition.component[3], Some(0));
    // Singletons are ranked by id: "lonely" < "x".
    assert_eq!(partition.component[4], Some(1));
    assert_eq!(partition.component[0], Some(2));
}

#[test]
fn compute_partition_splits_cliques_joined_by_a_bridge() {
    let (entities, relations) = two_cliques_with_bridge();
    let partition = compute_partition(&entities, &relations, &PartitionOptions::default());

    assert_eq!(partition.component_count(), 1);
    let a = partition.community[0];
    let b = partition.community[5];
    assert_ne!(a, b);
    for i in 0..5 {
        assert_eq!(partition.community[i], a);
        assert_eq!(partition.community[5 + i], b);
    }
}

#[test]
fn assign_partition_writes_group_ids_and_is_order_independent() {
    let (mut entities, relations) = two_cliques_with_bridge();
    let mut shuffled = entities.clone();
    shuffled.reverse();
    shuffled.swap(1, 7);

    assign_partition(&mut entities, &relations, &PartitionOptions::default());
    assign_partition(&mut shuffled, &relations, &PartitionOptions::default());

    let a = GroupIndex::build(&entities).partition(&entities);
    let b = GroupIndex::build(&shuffled).partition(&shuffled);
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[test]
fn assign_partition_skips_inactive_entities_by_default() {
    let mut entities = vec![
        Entity::new("a").with_groups(7, 7).inactive(Side::White),
        Entity::new("b"),
        Entity::new("c"),
    ];
    let relations = vec![Relation::new("a", "b"), Relation::new("b", "c")];
    assign_partition(&mut entities, &relations, &PartitionOptions::default());
    assert_eq!((entities[0].outer_group, entities[0].inner_group), (7, 7));
    assert_eq!(entities[1].outer_group, entities[2].outer_group);
}

#[test]
fn modularity_prefers_the_natural_split() {
    let (entities, relations) = two_cliques_with_bridge();
    let split = (0..10).map(|i| if i < 5 { 0 } else { 1 }).collect::<Vec<i64>>();
    let single = vec![0i64; 10];
    let q_split = modularity(&entities, &relations, &split);
    let q_single = modularity(&entities, &relations, &single);
    assert!(q_split > 0.3, "q_split={q_split}");
    assert!(q_single.abs() < 1e-12, "q_single={q_single}");
    assert_eq!(modularity(&entities, &[], &single), 0.0);
}
