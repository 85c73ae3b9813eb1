use crate::model::ExtractedRecipe;
use crate::resolve::{
    InstructionStep, Instructions, Keywords, Person, Publisher, RecipeYield, ResolvedRecipeNode,
};

/// Maps a resolved recipe node onto the canonical field shapes.
///
/// Never fails: a field missing from the node is missing from the result.
/// Delimited keywords are split on `,` with each piece trimmed and empty
/// pieces dropped.
pub fn normalize(node: ResolvedRecipeNode) -> ExtractedRecipe {
    ExtractedRecipe {
        name: node.name,
        keywords: node.keywords.map(keyword_list),
        image: node.image,
        recipe_yield: node.recipe_yield.map(|yield_val| match yield_val {
            RecipeYield::Text(text) => text,
            RecipeYield::Other(_) => String::new(),
        }),
        recipe_ingredient: node.recipe_ingredient,
        recipe_instructions: node.recipe_instructions.map(instruction_texts),
        publisher: node.publisher.and_then(|Publisher { name }| name),
        author: node.author.and_then(author_names),
    }
}

fn keyword_list(keywords: Keywords) -> Vec<String> {
    match keywords {
        Keywords::List(list) => list,
        Keywords::Delimited(text) => text
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(String::from)
            .collect(),
    }
}

fn instruction_texts(instructions: Instructions) -> Vec<String> {
    match instructions {
        Instructions::Text(text) => vec![text],
        Instructions::Steps(steps) => {
            let mut texts = Vec::with_capacity(steps.len());
            collect_steps(steps, &mut texts);
            texts
        }
    }
}

fn collect_steps(steps: Vec<InstructionStep>, texts: &mut Vec<String>) {
    for step in steps {
        match step {
            InstructionStep::Section { item_list_element } => {
                collect_steps(item_list_element, texts)
            }
            InstructionStep::Step { text } | InstructionStep::Plain(text) => texts.push(text),
            InstructionStep::Unrecognized(_) => {}
        }
    }
}

fn author_names(authors: Vec<Person>) -> Option<String> {
    let names: Vec<String> = authors.into_iter().filter_map(|person| person.name).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(","))
    }
}
