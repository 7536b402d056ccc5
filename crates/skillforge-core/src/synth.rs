//! Content synthesis: the last-resort link resolver.
//!
//! When neither the catalogs nor web search produce a link, we write the
//! study material ourselves. Tier one asks the configured generator with a
//! kind-specific prompt; tier two is an infallible hand-authored template.
//! Either way the result is an inline link, so synthesis never fails.

use tracing::{debug, warn};

use crate::generate::{Generator, prompt};
use crate::model::{ResourceKind, ResourceLink, WorkerProfile};

/// A synthesized resource: the text plus its inline link form.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedContent {
    pub content: String,
    pub link: ResourceLink,
}

/// Synthesize study content for a resource mention.
pub async fn synthesize(
    title: &str,
    kind: ResourceKind,
    topic: &str,
    profile: &WorkerProfile,
    generator: &dyn Generator,
) -> SynthesizedContent {
    let content_prompt = prompt::build_content_prompt(title, kind, topic, profile);
    let content = match generator.generate_content(&content_prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            debug!(title, "generator produced no content, using template");
            fallback_template(title, kind, topic)
        }
        Err(err) => {
            warn!(title, %err, "content generation failed, using template");
            fallback_template(title, kind, topic)
        }
    };
    SynthesizedContent {
        link: ResourceLink::GeneratedInline(content.clone()),
        content,
    }
}

/// The hand-authored tier-two template. Always available, interpolates
/// the title and topic so the document is at least nominally on subject.
pub fn fallback_template(title: &str, kind: ResourceKind, topic: &str) -> String {
    match kind {
        ResourceKind::Pdf => format!(
            "# {title}\n\n\
             ## Overview\n\
             This guide introduces {topic} for industrial maintenance work. It covers the \
             core concepts, how they apply on the shop floor, and the safety rules that \
             always come first.\n\n\
             ## Key Concepts\n\
             - Identify the main components involved in {topic} systems.\n\
             - Understand normal operating conditions and how to recognize deviations.\n\
             - Know the documentation for the equipment you maintain.\n\n\
             ## Practical Applications\n\
             Apply these concepts during routine inspections and scheduled maintenance. \
             Compare readings and behavior against the equipment manual before acting.\n\n\
             ## Safety Considerations\n\
             - Follow lockout tagout procedures before any service work.\n\
             - Wear the personal protective equipment your site requires.\n\
             - Never bypass an interlock or guard, even for a quick check.\n\n\
             ## Step-by-Step Procedures\n\
             1. Review the work order and the relevant equipment manual.\n\
             2. Isolate and verify zero energy.\n\
             3. Perform the inspection or repair, recording what you find.\n\
             4. Restore the equipment and verify normal operation.\n\n\
             ## Troubleshooting Guide\n\
             Work from symptom to cause: confirm the reported fault, check the simple \
             explanations first (power, connections, settings), then isolate subsystems \
             one at a time.\n\n\
             ## Best Practices\n\
             Keep records of every intervention. Small anomalies logged today prevent \
             breakdowns next quarter.\n\n\
             ## Summary\n\
             {title} is part of a structured approach to {topic}. Review this material \
             alongside the hands-on portions of your training plan.\n"
        ),
        ResourceKind::Video => format!(
            "# {title} (video script)\n\n\
             [00:00] Introduction: what {topic} means for your daily maintenance work \
             and what this session demonstrates.\n\n\
             [02:00] Walkaround: the main components of a typical {topic} installation \
             and what each one does.\n\n\
             [08:00] Demonstration: a routine inspection, narrated step by step, with \
             the readings and checks to perform.\n\n\
             [15:00] Common faults: what failure looks like, and which symptoms point \
             to which causes.\n\n\
             [22:00] Recap: the three things to remember, plus where this connects to \
             the rest of your training plan.\n"
        ),
        ResourceKind::Interactive => format!(
            "# {title} (hands-on exercise)\n\n\
             ## Scenario\n\
             A production line reports an intermittent fault related to {topic}. You \
             are assigned to investigate during the next planned stop.\n\n\
             ## Required Tools\n\
             Equipment manual, multimeter or gauge set appropriate for {topic}, lockout \
             devices, inspection checklist.\n\n\
             ## Steps\n\
             1. Apply lockout tagout and verify isolation.\n\
             2. Perform a visual inspection and note anything out of spec.\n\
             3. Take measurements at the points listed in the manual.\n\
             4. Compare against nominal values and form a hypothesis.\n\
             5. Verify the hypothesis with one targeted check.\n\n\
             ## Checkpoints\n\
             - Isolation verified before any contact.\n\
             - Every measurement recorded with its nominal value.\n\n\
             ## Reflection\n\
             Which symptom was most informative? What would you check first next time?\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use crate::model::WorkerProfile;

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }
        async fn generate_plan(&self, _profile: &WorkerProfile) -> Result<String> {
            bail!("down")
        }
        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            bail!("down")
        }
        async fn tutor_reply(&self, _message: &str, _context: &str) -> Result<String> {
            bail!("down")
        }
    }

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl Generator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }
        async fn generate_plan(&self, _profile: &WorkerProfile) -> Result<String> {
            Ok(self.0.to_owned())
        }
        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_owned())
        }
        async fn tutor_reply(&self, _message: &str, _context: &str) -> Result<String> {
            Ok(self.0.to_owned())
        }
    }

    #[test]
    fn template_interpolates_title_and_topic() {
        for kind in ResourceKind::ALL {
            let text = fallback_template("Pump Care", kind, "hydraulics");
            assert!(text.contains("Pump Care"), "{kind} template misses title");
            assert!(text.contains("hydraulics"), "{kind} template misses topic");
        }
    }

    #[tokio::test]
    async fn generator_content_is_preferred() {
        let out = synthesize(
            "PLC Basics",
            ResourceKind::Pdf,
            "plc",
            &WorkerProfile::default(),
            &CannedGenerator("# Custom Doc"),
        )
        .await;
        assert_eq!(out.content, "# Custom Doc");
        assert_eq!(out.link, ResourceLink::GeneratedInline("# Custom Doc".into()));
    }

    #[tokio::test]
    async fn failing_generator_falls_back_to_template() {
        let out = synthesize(
            "PLC Basics",
            ResourceKind::Pdf,
            "plc",
            &WorkerProfile::default(),
            &FailingGenerator,
        )
        .await;
        assert!(out.content.contains("PLC Basics"));
        assert!(out.link.is_some());
    }

    #[tokio::test]
    async fn blank_generator_output_falls_back_to_template() {
        let out = synthesize(
            "PLC Basics",
            ResourceKind::Video,
            "plc",
            &WorkerProfile::default(),
            &CannedGenerator("   \n"),
        )
        .await;
        assert!(out.content.contains("video script"));
    }
}
