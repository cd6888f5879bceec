use serde::Serialize;
use trsfile::core::format::RecordLayout;
use trsfile::TraceSet;

#[derive(Debug, Serialize)]
pub struct TraceSetSummary {
    pub path: String,
    pub header_size: Option<u64>,
    pub number_of_traces: usize,
    pub layout: LayoutSummary,
    pub tags: Vec<TagSummary>,
    pub trace_set_parameters: Vec<ParameterSummary>,
    pub parameter_definitions: Vec<DefinitionSummary>,
    pub diagnostics: Vec<String>,
    pub traces: Vec<TraceSummary>,
}

#[derive(Debug, Serialize)]
pub struct LayoutSummary {
    pub title_space: usize,
    pub parameter_size: usize,
    pub sample_count: usize,
    pub sample_coding: String,
    pub record_size: u64,
    pub legacy: bool,
}

#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub tag: String,
    pub mnemonic: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ParameterSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    pub length: usize,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct DefinitionSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    pub offset: u16,
    pub length: u16,
}

#[derive(Debug, Serialize)]
pub struct TraceSummary {
    pub index: usize,
    pub title: String,
    pub number_of_samples: usize,
    pub parameters: Vec<String>,
}

impl TraceSetSummary {
    /// Collects header details and the first `preview` traces of an open read session.
    pub fn collect(trace_set: &mut TraceSet, preview: usize) -> trsfile::Result<Self> {
        let metadata = trace_set.metadata();
        let layout = RecordLayout::from_metadata(metadata)?;

        let tags = metadata
            .non_default_tags()
            .map(|tag| TagSummary {
                tag: format!("{:?}", tag),
                mnemonic: tag.name(),
                value: metadata.get(tag).to_string(),
            })
            .collect();

        let trace_set_parameters = metadata
            .trace_set_parameters()
            .iter()
            .map(|(name, p)| ParameterSummary {
                name: name.to_string(),
                param_type: p.value().param_type().name(),
                length: p.value().len(),
                value: p.value().to_string(),
            })
            .collect();

        let parameter_definitions = metadata
            .trace_parameter_definitions()
            .iter()
            .map(|(name, d)| DefinitionSummary {
                name: name.to_string(),
                param_type: d.param_type.name(),
                offset: d.offset,
                length: d.length,
            })
            .collect();

        let mut summary = Self {
            path: trace_set.path().display().to_string(),
            header_size: trace_set.header_size(),
            number_of_traces: trace_set.number_of_traces(),
            layout: LayoutSummary {
                title_space: layout.title_space,
                parameter_size: layout.parameter_size,
                sample_count: layout.sample_count,
                sample_coding: format!("{:?}", layout.coding),
                record_size: layout.record_size()?,
                legacy: layout.legacy,
            },
            tags,
            trace_set_parameters,
            parameter_definitions,
            diagnostics: metadata.diagnostics().iter().map(|d| d.to_string()).collect(),
            traces: Vec::new(),
        };

        for index in 0..preview.min(summary.number_of_traces) {
            let trace = trace_set.get(index)?;
            summary.traces.push(TraceSummary {
                index,
                title: trace.title().to_string(),
                number_of_samples: trace.number_of_samples(),
                parameters: trace.parameters().keys().map(str::to_string).collect(),
            });
        }
        Ok(summary)
    }
}
