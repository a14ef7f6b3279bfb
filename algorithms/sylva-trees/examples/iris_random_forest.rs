use sylva::prelude::*;
use sylva_datasets::iris;
use sylva_trees::{DecisionTree, TreeEnsemble};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Load & split Iris
    let (train, valid) = iris().stratified_split(0.8, 42);

    // 2. Single-tree baseline, pruned against a fifth of the training set
    let dt_model = DecisionTree::params().fit(&train)?;
    println!(
        "Single-tree accuracy: {:.2} ({} nodes, depth {})",
        dt_model.test(&valid).accuracy(),
        dt_model.num_nodes(),
        dt_model.max_depth()
    );

    // 3. Bagging
    let bagging = TreeEnsemble::bagging().ensemble_size(50).fit(&train)?;
    println!("Bagging accuracy: {:.2}", bagging.test(&valid).accuracy());

    // 4. Random Forest
    let rf_model = TreeEnsemble::random_forest()
        .ensemble_size(50)
        .attribute_subset_size(2)
        .fit(&train)?;
    println!("Random-forest accuracy: {:.2}", rf_model.test(&valid).accuracy());

    // 5. Store the forest and read it back
    let path = std::env::temp_dir().join("iris_random_forest.model");
    rf_model.save(&path)?;
    let restored = TreeEnsemble::load(&path)?;
    println!(
        "Restored forest of {} trees, accuracy: {:.2}",
        restored.len(),
        restored.test(&valid).accuracy()
    );

    Ok(())
}
