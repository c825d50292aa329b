//! Instruction templates for the prompt pipelines

pub const CLASSIFY_QUERY: &str = r#"You route questions for a document question-answering assistant.
Pick exactly one category for the question:
- document_based: answerable from the user's uploaded study documents
- requires_web_search: needs current events or facts unlikely to be in the documents
- ambiguous_or_general: greetings, chit-chat or anything too vague to route

Reply with the category name only.

Question: ${var:question}
Category:"#;

pub const GRADE_DOCUMENTS: &str = r#"You judge whether a set of retrieved excerpts, taken together, contains information relevant to a question.
Reply 'yes' if any excerpt helps answer it, otherwise 'no'. Reply with the single word only.

Excerpts:
${var:documents}

Question: ${var:question}
Relevant (yes/no):"#;

pub const REWRITE_QUERY: &str = r#"Rewrite the question below so that it retrieves better matches from a vector search over textbook excerpts.
Keep the meaning, expand abbreviations and add key technical terms. Reply with the rewritten question only.

Original question: ${var:question}
Rewritten question:"#;

pub const SUMMARIZE_CONTEXT: &str = r#"Condense the excerpts below into a digest that keeps every fact needed to answer the question.
Keep formulas, definitions and numbers exactly as written. Do not add outside knowledge.

Question: ${var:question}

Excerpts:
${var:documents}

Digest:"#;

pub const GENERATE_ANSWER: &str = r#"You answer questions using only the supplied context from technical documents.
If the context does not contain the answer, say so plainly. Keep the answer concise and precise.

Context:
${var:context}

Question: ${var:question}
Answer:"#;

pub const INSUFFICIENT_ANSWER: &str = r#"The document search found nothing relevant to the question below.
Tell the user, in one or two sentences, that the provided documents do not contain information to answer it and suggest rephrasing or asking about another topic. Do not attempt to answer.

Question: ${var:question}
Reply:"#;

pub const CRITIQUE_ANSWER: &str = r#"You check a generated answer against the question and the retrieved context only.
Reply PASS if the answer addresses the question and every claim is supported by the context.
Reply FAIL if it is off-topic, unsupported or contradicts the context. Reply with PASS or FAIL only.

Question: ${var:question}

Context:
${var:context}

Answer:
${var:generation}

Verdict:"#;

pub const STUDY_QUESTIONS: &str = r#"You are a study assistant. Write questions based only on the excerpt below, testing understanding of the topic "${var:topic}".
Difficulty is ${var:difficulty} on a 1-20 scale:
- 1-5: definitions and simple recall
- 6-10: explaining concepts and direct use of formulas
- 11-15: comparing ideas, relationships and reading curves or data
- 16-20: analysis, multi-step problems and connecting several concepts

Write ${var:num_questions} distinct questions, one per line, each starting with its number.

Excerpt:
${var:context}

Questions:"#;

pub const SUMMARIZE_TOPIC: &str = r#"Write concise study notes on the topic "${var:topic}" from the excerpts below.
Use bullet points or numbered lists where they help. Include nothing that is not in the excerpts.

Excerpts:
${var:context}

Notes:"#;
