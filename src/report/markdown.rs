use crate::analyze::{OrgSummary, PeriodReport};
use crate::model::{Error, PullRequest, Result};
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;
use tracing::info;

pub trait MarkdownReport {
    fn render_markdown(&self) -> Result<String>;

    fn write_markdown(&self, path: &str) -> Result<()> {
        fs::write(path, self.render_markdown()?)?;
        info!(path, "Wrote markdown report");
        Ok(())
    }
}

impl MarkdownReport for PeriodReport {
    fn render_markdown(&self) -> Result<String> {
        let mut doc = Markdown::new();
        doc.header1(format!("Pull requests by {}", self.period.title()));

        let header = [
            vec![Heading::new(self.period.title().to_string(), None)],
            self.labels
                .iter()
                .map(|label| Heading::new(label.to_string(), Some(HeadingAlignment::Center)))
                .collect::<Vec<_>>(),
        ]
        .concat();

        let mut table = vec![];
        for (key, counters) in &self.buckets {
            let row = self
                .labels
                .iter()
                .map(|label| counters.get(label).copied().unwrap_or_default())
                .map(|count| format!("{count}"))
                .collect::<Vec<_>>();
            table.push([vec![format!("**{key}**")], row].concat());
        }

        doc.paragraph(render_table(table, header)?);
        Ok(doc.render())
    }
}

impl MarkdownReport for OrgSummary {
    fn render_markdown(&self) -> Result<String> {
        let mut doc = Markdown::new();
        doc.header1("Merged external pull requests by organization");

        let header = vec![
            Heading::new("Organization".to_string(), None),
            Heading::new("Merged".to_string(), Some(HeadingAlignment::Center)),
        ];
        let table = self
            .counts()
            .into_iter()
            .map(|(org, count)| vec![org.to_string(), format!("{count}")])
            .collect::<Vec<_>>();
        doc.paragraph(render_table(table, header)?);

        add_listing(&mut doc, "'Other' pull requests", self.other())?;
        add_listing(&mut doc, "Unsigned authors", self.unsigned())?;
        Ok(doc.render())
    }
}

fn add_listing(doc: &mut Markdown, title: &str, pulls: &[PullRequest]) -> Result<()> {
    if pulls.is_empty() {
        return Ok(());
    }
    doc.header2(title);
    let header = vec![
        Heading::new("#".to_string(), None),
        Heading::new("Author".to_string(), None),
        Heading::new("Title".to_string(), None),
    ];
    let table = pulls
        .iter()
        .map(|pull| {
            vec![
                format!("{}", pull.number),
                pull.author_login.clone(),
                pull.title.replace('|', "\\|"),
            ]
        })
        .collect::<Vec<_>>();
    doc.paragraph(render_table(table, header)?);
    Ok(())
}

fn render_table(table: Vec<Vec<String>>, header: Vec<Heading>) -> Result<String> {
    if table.is_empty() {
        return Ok("_No pull requests._".to_string());
    }
    let mut md_table = MarkdownTable::new(table);
    md_table.with_headings(header);
    md_table
        .as_markdown()
        .map_err(|err| Error::Report(format!("{err:?}")))
}
