//! Keyword frequencies and method-phrase mentions.

use std::collections::BTreeMap;

use citeline_core::{ExtractionConfig, Paper};
use serde::Serialize;

/// One method phrase and how many abstracts mention it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodMention {
    pub method: String,
    pub paper_count: usize,
}

/// Keyword -> number of papers carrying it. Keywords are trimmed; the same
/// keyword twice on one paper counts once.
pub fn extract_topics(papers: &[Paper]) -> BTreeMap<String, usize> {
    let mut topics: BTreeMap<String, usize> = BTreeMap::new();
    for paper in papers {
        let mut seen: Vec<&str> = paper
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        for keyword in seen {
            *topics.entry(keyword.to_string()).or_default() += 1;
        }
    }
    topics
}

/// Method phrases found in abstracts, in vocabulary order. Phrases no
/// abstract mentions are omitted.
pub fn methods_from_abstracts(papers: &[Paper], config: &ExtractionConfig) -> Vec<MethodMention> {
    let abstracts: Vec<String> = papers
        .iter()
        .filter(|p| !p.abstract_text.trim().is_empty())
        .map(|p| p.abstract_text.to_lowercase())
        .collect();

    config
        .method_phrases
        .iter()
        .filter_map(|phrase| {
            let needle = phrase.trim().to_lowercase();
            if needle.is_empty() {
                return None;
            }
            let paper_count = abstracts.iter().filter(|a| a.contains(&needle)).count();
            (paper_count > 0).then(|| MethodMention {
                method: phrase.trim().to_string(),
                paper_count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_count_papers() {
        let papers = vec![
            Paper::new("p1", 2020).with_keywords(["graphs", " graphs ", "ranking"]),
            Paper::new("p2", 2021).with_keywords(["graphs", ""]),
            Paper::new("p3", 2021),
        ];
        let topics = extract_topics(&papers);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics["graphs"], 2);
        assert_eq!(topics["ranking"], 1);
    }

    #[test]
    fn methods_case_insensitive_in_vocabulary_order() {
        let papers = vec![
            Paper::new("p1", 2020).with_abstract("We use Dropout and gradient descent."),
            Paper::new("p2", 2021).with_abstract("Plain GRADIENT DESCENT, nothing else."),
            Paper::new("p3", 2021),
        ];
        let mentions = methods_from_abstracts(&papers, &ExtractionConfig::default());
        assert_eq!(
            mentions,
            vec![
                MethodMention {
                    method: "gradient descent".into(),
                    paper_count: 2
                },
                MethodMention {
                    method: "dropout".into(),
                    paper_count: 1
                },
            ]
        );
    }

    #[test]
    fn custom_vocabulary() {
        let config = ExtractionConfig {
            method_phrases: vec!["PageRank".into(), "  ".into()],
        };
        let papers = vec![Paper::new("p1", 2020).with_abstract("a pagerank variant")];
        let mentions = methods_from_abstracts(&papers, &config);
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].method, "PageRank");
    }
}
