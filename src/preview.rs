use crate::vfs::VirtualFS;
use colored::Colorize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A node of the preview tree, children referenced by index into the arena.
#[derive(Debug)]
struct TreeNode {
    name: String,
    is_file: bool,
    children: Vec<usize>,
}

/// One rendered row: the `│   ├── ` style prefix followed by the entry name.
#[derive(Debug, PartialEq, Eq)]
struct Row {
    prefix: String,
    name: String,
    is_file: bool,
}

/// Links every VFS entry under its parent. Index 0 is the destination itself.
fn build_tree(vfs: &VirtualFS, destination: &Path) -> Vec<TreeNode> {
    let root_name = destination
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| destination.display().to_string());

    let mut nodes = vec![TreeNode {
        name: root_name,
        is_file: false,
        children: Vec::new(),
    }];
    let mut lookup: HashMap<PathBuf, usize> = HashMap::new();
    lookup.insert(PathBuf::new(), 0);

    for entry in &vfs.entries {
        let parent = entry
            .destination
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let Some(&parent_index) = lookup.get(&parent) else {
            log::debug!(
                "parent: {}, not found for path: {}",
                parent.display(),
                entry.destination.display()
            );
            continue;
        };

        let name = entry
            .destination
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_default();

        nodes.push(TreeNode {
            name,
            is_file: entry.is_file,
            children: Vec::new(),
        });
        let index = nodes.len() - 1;

        nodes[parent_index].children.push(index);
        if !entry.is_file {
            lookup.insert(entry.destination.clone(), index);
        }
    }

    nodes
}

fn render(nodes: &[TreeNode], index: usize, prefix: &str, is_last: bool, rows: &mut Vec<Row>) {
    let node = &nodes[index];
    let connector = if is_last { "└── " } else { "├── " };

    rows.push(Row {
        prefix: format!("{prefix}{connector}"),
        name: node.name.clone(),
        is_file: node.is_file,
    });

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    for (position, &child) in node.children.iter().enumerate() {
        let last = position + 1 == node.children.len();
        render(nodes, child, &child_prefix, last, rows);
    }
}

/// Prints the structure recorded in `vfs` as a tree rooted at `destination`.
pub fn preview_as_tree(vfs: &VirtualFS, destination: &Path) {
    let nodes = build_tree(vfs, destination);
    let mut rows = Vec::new();
    render(&nodes, 0, "", true, &mut rows);

    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    println!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    for row in rows {
        let name = if row.is_file {
            row.name.green()
        } else {
            row.name.blue()
        };
        println!("{}{}", row.prefix.yellow(), name);
    }

    println!("\n{}", "└─".bold().bright_blue());
}
