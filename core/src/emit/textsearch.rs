use std::io::Write;

use super::Emitter;
use crate::acl::ObjectMetadata;
use crate::ddl::{TextSearchConfiguration, TextSearchDictionary, TextSearchParser, TextSearchTemplate};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::TocObject;

pub fn create_text_search_parser_statement(parser: &TextSearchParser) -> String {
    let mut sql = format!(
        "\n\nCREATE TEXT SEARCH PARSER {} (\n\tSTART = {},\n\tGETTOKEN = {},\n\tEND = {},\n\tLEXTYPES = {}",
        parser.fqn(),
        parser.start_func,
        parser.token_func,
        parser.end_func,
        parser.lex_types_func
    );
    if !parser.headline_func.is_empty() {
        sql.push_str(&format!(",\n\tHEADLINE = {}", parser.headline_func));
    }
    sql.push_str("\n);\n");
    sql
}

pub fn create_text_search_template_statement(template: &TextSearchTemplate) -> String {
    let init = if template.init_func.is_empty() {
        String::new()
    } else {
        format!("\n\tINIT = {},", template.init_func)
    };
    format!(
        "\n\nCREATE TEXT SEARCH TEMPLATE {} ({init}\n\tLEXIZE = {}\n);\n",
        template.fqn(),
        template.lexize_func
    )
}

pub fn create_text_search_dictionary_statement(dictionary: &TextSearchDictionary) -> String {
    let options = if dictionary.init_option.is_empty() {
        String::new()
    } else {
        format!(",\n\t{}", dictionary.init_option)
    };
    format!(
        "\n\nCREATE TEXT SEARCH DICTIONARY {} (\n\tTEMPLATE = {}{options}\n);\n",
        dictionary.fqn(),
        dictionary.template
    )
}

pub fn create_text_search_configuration_statement(config: &TextSearchConfiguration) -> String {
    format!(
        "\n\nCREATE TEXT SEARCH CONFIGURATION {} (\n\tPARSER = {}\n);\n",
        config.fqn(),
        config.parser
    )
}

/// One `ADD MAPPING` per token type, in token order.
pub fn text_search_mapping_statements(config: &TextSearchConfiguration) -> Vec<String> {
    config
        .token_to_dicts
        .iter()
        .map(|(token, dicts)| {
            format!(
                "\n\nALTER TEXT SEARCH CONFIGURATION {}\n\tADD MAPPING FOR \"{token}\" WITH {};\n",
                config.fqn(),
                dicts.join(", ")
            )
        })
        .collect()
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_text_search_parser(
        &mut self,
        parser: &TextSearchParser,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(parser.metadata_entry(), &create_text_search_parser_statement(parser))?;
        gpdump_trace_object!("TEXT SEARCH PARSER", parser.fqn());
        self.print_object_metadata(parser, metadata, None)
    }

    pub fn print_create_text_search_template(
        &mut self,
        template: &TextSearchTemplate,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(template.metadata_entry(), &create_text_search_template_statement(template))?;
        gpdump_trace_object!("TEXT SEARCH TEMPLATE", template.fqn());
        self.print_object_metadata(template, metadata, None)
    }

    pub fn print_create_text_search_dictionary(
        &mut self,
        dictionary: &TextSearchDictionary,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(
            dictionary.metadata_entry(),
            &create_text_search_dictionary_statement(dictionary),
        )?;
        gpdump_trace_object!("TEXT SEARCH DICTIONARY", dictionary.fqn());
        self.print_object_metadata(dictionary, metadata, None)
    }

    /// Each mapping is its own TOC entry under the configuration.
    pub fn print_create_text_search_configuration(
        &mut self,
        config: &TextSearchConfiguration,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(config.metadata_entry(), &create_text_search_configuration_statement(config))?;
        for mapping in text_search_mapping_statements(config) {
            self.emit(config.metadata_entry(), &mapping)?;
        }
        gpdump_trace_object!("TEXT SEARCH CONFIGURATION", config.fqn());
        self.print_object_metadata(config, metadata, None)
    }
}
