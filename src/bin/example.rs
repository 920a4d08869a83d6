use dynamic_connectivity::Connectivity;

fn add_edge(g: &mut Connectivity<u32>, u: u32, v: u32) {
    let added = g.add_edge(&u, &v).expect("allocation should succeed");
    println!(
        "add_edge({u}, {v}) -> {} (now {} component(s))",
        added,
        g.num_components()
    );
}

fn remove_edge(g: &mut Connectivity<u32>, u: u32, v: u32) {
    let removed = g.remove_edge(&u, &v);
    println!(
        "remove_edge({u}, {v}) -> {} (now {} component(s))",
        removed,
        g.num_components()
    );
}

fn main() {
    let mut g = Connectivity::with_seed(42);
    for v in 0..10u32 {
        g.add_node(v);
    }
    println!("Created 10 isolated nodes (0..10)");

    for v in 0..9u32 {
        add_edge(&mut g, v, v + 1);
    }
    println!("Built a path 0-1-...-9");
    println!("connected(0, 9) = {}", g.connected(&0, &9));
    println!("component_size(0) = {}", g.component_size(&0));

    remove_edge(&mut g, 4, 5);
    println!("After cutting 4-5:");
    println!("connected(0, 9) = {}", g.connected(&0, &9));
    println!("component_of(0) = {:?}", g.component_of(&0));
    println!("component_of(9) = {:?}", g.component_of(&9));

    add_edge(&mut g, 0, 9);
    println!("After linking 0-9 (reconnecting the two halves):");
    println!("connected(0, 9) = {}", g.connected(&0, &9));

    g.validate().expect("internal invariants should hold");
    println!("validate() passed");
}
