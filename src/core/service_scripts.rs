use crate::core::script::quote;
use crate::core::substitutor::substitute;
use crate::domain::model::{Category, Service};
use crate::domain::ports::{AssetSink, ScriptAttributes, TokenSource};
use crate::utils::error::Result;

/// Consent branch for one service, run on accept and on change.
pub fn opt_in_out_block(service: &Service) -> String {
    let identifier = quote(&service.identifier);
    let opt_out = substitute(&service.opt_out_code, &service.variables);
    let opt_in = substitute(&service.opt_in_code, &service.variables);

    format!(
        "\n  if(!cc.allowedCategory({id})){{\n    manager.rejectService({id});\n    {opt_out}\n  }}else{{\n    manager.acceptService({id});\n    {opt_in}\n  }}",
        id = identifier,
        opt_out = opt_out,
        opt_in = opt_in
    )
}

/// Every service's block, concatenated in record order.
pub fn opt_in_out_script(categories: &[Category]) -> String {
    categories
        .iter()
        .flat_map(|category| &category.services)
        .map(opt_in_out_block)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub external: usize,
    pub inline: usize,
}

/// Registers external scripts of each service as inert placeholders.
///
/// Services that load external scripts also get their opt-in code registered
/// as a deferred inline placeholder with a random element id.
pub fn register_service_scripts(
    categories: &[Category],
    sink: &dyn AssetSink,
    tokens: &dyn TokenSource,
) -> Result<RegistrationSummary> {
    let mut summary = RegistrationSummary::default();

    for service in categories.iter().flat_map(|category| &category.services) {
        if service.external_scripts.is_empty() {
            continue;
        }

        for script in &service.external_scripts {
            let link = substitute(&script.link, &service.variables);
            sink.register_external_script(
                &script.name,
                &link,
                &ScriptAttributes::placeholder(service.identifier.as_str(), script.is_async),
            )?;
            summary.external += 1;
        }

        if !service.opt_in_code.trim().is_empty() {
            let code = substitute(&service.opt_in_code, &service.variables);
            let id = tokens.token();
            sink.register_inline_script(
                &id,
                &code,
                &ScriptAttributes::deferred_placeholder(service.identifier.as_str()),
            )?;
            summary.inline += 1;
        }
    }

    tracing::debug!(
        external = summary.external,
        inline = summary.inline,
        "service scripts registered"
    );
    Ok(summary)
}
