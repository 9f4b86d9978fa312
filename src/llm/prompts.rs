//! Prompt construction for the two rewriting passes.

use crate::corpus::TrainingExample;
use crate::rules::removal_terms_joined;

pub const STANDARDIZER_SYSTEM: &str =
    "You are an AI assistant that standardizes inventory item names for a restaurant.";

pub const CORRECTOR_SYSTEM: &str =
    "You are an AI assistant that evaluates and corrects standardized inventory item names. \
     You respond with a single well-formed JSON object.";

/// Renders in-context examples as `Input:`/`Output:` pairs.
pub fn render_examples(examples: &[&TrainingExample]) -> String {
    examples
        .iter()
        .map(|example| format!("Input: {}\nOutput: {}", example.prompt, example.completion))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_rules(rules: &[&str]) -> String {
    rules
        .iter()
        .map(|rule| format!("- {}", rule))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First-pass rewrite prompt: in-context examples, category directives, the
/// general normalization rules, and the literal item description.
pub fn standardize_prompt(
    description: &str,
    category_rules: &[&str],
    examples: &[&TrainingExample],
) -> String {
    format!(
        "As a restaurant inventory manager, standardize this inventory item name using these guidelines:\n\
{examples}\n\
{rules}\n\
Item Name: {description}\n\
\n\
Rules for Food Items:\n\
1. Format: Ingredient, Description\n\
2. Ingredient should come first, followed by a comma and then the description\n\
3. Use 2-4 words total\n\
4. Capitalize only the first letter of the ingredient\n\
5. Remove all packaging information from the name\n\
\n\
Rules for Non-Food Items:\n\
1. Include size and essential details in the name\n\
2. Use 2-4 words total\n\
3. Capitalize the first letter of each word\n\
\n\
General Rules:\n\
4. Remove brand names unless essential\n\
5. Use well-known culinary abbreviations\n\
6. Remove terms like \"refrigerator,\" \"plastic,\" \"shelf-stable\"\n\
7. Remove place names\n\
8. For produce, include \"Fresh\" only if distinguishing\n\
9. For meat and seafood, include cut and preparation\n\
10. For dairy, specify type\n\
11. For spices, include form\n\
12. Remove terms: {removal_terms}\n\
13. Keep essential descriptors\n\
\n\
Task: Standardize this item description: {description}",
        examples = render_examples(examples),
        rules = render_rules(category_rules),
        removal_terms = removal_terms_joined(),
        description = description,
    )
}

/// Second-pass prompt: presents both the candidate and original names and
/// demands a JSON object with `final_corrected_name` and `explanation`.
pub fn correction_prompt(
    standardized_name: &str,
    original_name: &str,
    category_rules: &[&str],
    examples: &[&TrainingExample],
) -> String {
    format!(
        "Evaluate and correct the following standardized inventory item name:\n\
Standardized name: {standardized_name}\n\
Original name: {original_name}\n\
Category rules:\n\
{rules}\n\
\n\
Training examples:\n\
{examples}\n\
\n\
Terms to remove: {removal_terms}\n\
\n\
Instructions:\n\
- Put core item first\n\
- Focus on fundamental identity\n\
- Use \"Core Item, Descriptors\" format\n\
- Remove unnecessary words\n\
- Include brand names for beverages if well-known\n\
- Keep standard measurements when relevant\n\
\n\
Return ONLY a JSON object with exactly these fields:\n\
{{\"final_corrected_name\": \"<your corrected name>\", \"explanation\": \"<brief explanation>\"}}",
        standardized_name = standardized_name,
        original_name = original_name,
        rules = render_rules(category_rules),
        examples = render_examples(examples),
        removal_terms = removal_terms_joined(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(category: &str, prompt: &str, completion: &str) -> TrainingExample {
        TrainingExample {
            category: category.to_string(),
            prompt: prompt.to_string(),
            completion: completion.to_string(),
        }
    }

    #[test]
    fn test_examples_render_as_input_output_pairs() {
        let a = example("meat", "chicken brst 40lb", "Chicken breast, boneless");
        let b = example("meat", "grnd beef cs", "Beef, ground");
        let rendered = render_examples(&[&a, &b]);
        assert_eq!(
            rendered,
            "Input: chicken brst 40lb\nOutput: Chicken breast, boneless\n\
             Input: grnd beef cs\nOutput: Beef, ground"
        );
    }

    #[test]
    fn test_standardize_prompt_contains_all_sections() {
        let ex = example("meat", "chicken brst", "Chicken breast");
        let prompt = standardize_prompt("chkn diced 10lb bx", &["Include cut"], &[&ex]);
        assert!(prompt.contains("Input: chicken brst"));
        assert!(prompt.contains("- Include cut"));
        assert!(prompt.contains("12. Remove terms: plastic, plst"));
        assert!(prompt.contains("Task: Standardize this item description: chkn diced 10lb bx"));
    }

    #[test]
    fn test_correction_prompt_presents_both_names_and_json_contract() {
        let prompt = correction_prompt("Chicken, Diced", "chkn diced 10lb bx", &[], &[]);
        assert!(prompt.contains("Standardized name: Chicken, Diced"));
        assert!(prompt.contains("Original name: chkn diced 10lb bx"));
        assert!(prompt.contains("final_corrected_name"));
        assert!(prompt.contains("Terms to remove: plastic"));
    }
}
