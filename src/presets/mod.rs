use serde_json::{Value, json};

/// Built-in channel-type schema table, keyed by numeric channel type.
pub fn channel_schema_table() -> Value {
    json!({
        "generic": {
            "input": {
                "type": 1,
                "tag": "",
                "name": "",
                "base_url": "",
                "other": "",
                "models": [],
                "key": "",
                "model_mapping": "",
                "proxy": "",
                "test_model": "",
                "only_chat": false,
                "groups": ["default"]
            },
            "label": {
                "type": "Channel type",
                "tag": "Tag",
                "name": "Channel name",
                "base_url": "Channel API address",
                "other": "Other parameters",
                "models": "Models",
                "key": "Key",
                "model_mapping": "Model mapping",
                "proxy": "Proxy address",
                "test_model": "Test model",
                "only_chat": "Chat only",
                "groups": "User groups"
            },
            "prompt": {
                "type": "Select the channel type",
                "tag": "Channels sharing a tag can be edited together",
                "name": "Name this channel",
                "base_url": "Optional relay API address, e.g. a Cloudflare proxy",
                "other": "",
                "models": "Select the models this channel serves. A trailing * matches by prefix, e.g. gpt-3.5*",
                "key": "Enter the credential for this channel",
                "model_mapping": "JSON object mapping requested model ids to upstream ids, e.g. {\"gpt-3.5\": \"gpt-35\"}",
                "proxy": "Per-channel proxy, http or socks5, e.g. http://127.0.0.1:1080",
                "test_model": "Model used for speed tests; tests are disabled when empty, e.g. gpt-3.5-turbo",
                "only_chat": "Requests that call functions skip chat-only channels",
                "groups": "Select the user groups allowed to use this channel"
            },
            "model_group": "OpenAI"
        },
        "types": {
            "1": {
                "input": {
                    "models": ["gpt-3.5-turbo", "gpt-4", "gpt-4o", "gpt-4o-mini"],
                    "test_model": "gpt-3.5-turbo"
                },
                "provider_models_list": "Fetch models from OpenAI"
            },
            "3": {
                "label": {
                    "base_url": "AZURE_OPENAI_ENDPOINT",
                    "other": "Default API version"
                },
                "prompt": {
                    "base_url": "Enter the AZURE_OPENAI_ENDPOINT",
                    "other": "Default API version, e.g. 2024-05-01-preview"
                },
                "input": {
                    "test_model": "gpt-35-turbo"
                }
            },
            "8": {
                "prompt": {
                    "base_url": "Base URL of the custom channel, e.g. https://openai.example.com"
                },
                "provider_models_list": "Fetch models from the channel"
            },
            "11": {
                "input": {
                    "models": ["PaLM-2"],
                    "test_model": "PaLM-2"
                },
                "prompt": {
                    "base_url": "",
                    "test_model": ""
                },
                "model_group": "Google PaLM"
            },
            "14": {
                "input": {
                    "models": ["claude-3-haiku-20240307", "claude-3-5-sonnet-20240620", "claude-3-opus-20240229"],
                    "test_model": "claude-3-haiku-20240307"
                },
                "model_group": "Anthropic"
            },
            "15": {
                "input": {
                    "models": ["ERNIE-4.0-8K", "ERNIE-3.5-8K", "ERNIE-Speed-8K"],
                    "test_model": "ERNIE-Speed-8K"
                },
                "prompt": {
                    "key": "Format: APIKey|SecretKey",
                    "base_url": ""
                },
                "model_group": "Baidu"
            },
            "16": {
                "input": {
                    "models": ["glm-4", "glm-4v", "glm-3-turbo"],
                    "test_model": "glm-3-turbo"
                },
                "model_group": "Zhipu"
            },
            "17": {
                "input": {
                    "models": ["qwen-turbo", "qwen-plus", "qwen-max"],
                    "test_model": "qwen-turbo"
                },
                "label": {
                    "other": "Plugin parameters"
                },
                "prompt": {
                    "other": "Value of the X-DashScope-Plugin header, e.g. {\"calculator\": {}}",
                    "base_url": ""
                },
                "model_group": "Ali"
            },
            "18": {
                "input": {
                    "models": ["SparkDesk", "SparkDesk-v3.5", "SparkDesk-v4.0"],
                    "test_model": "SparkDesk-v3.5"
                },
                "label": {
                    "other": "Version"
                },
                "prompt": {
                    "key": "Format: APPID|APISecret|APIKey",
                    "other": "API version, e.g. v2.1",
                    "base_url": ""
                },
                "model_group": "Xunfei"
            },
            "23": {
                "input": {
                    "models": ["hunyuan"],
                    "test_model": "hunyuan"
                },
                "prompt": {
                    "key": "Format: AppId|SecretId|SecretKey",
                    "base_url": ""
                },
                "model_group": "Tencent"
            },
            "25": {
                "input": {
                    "models": ["gemini-1.5-pro", "gemini-1.5-flash"],
                    "test_model": "gemini-1.5-flash"
                },
                "label": {
                    "other": "Version"
                },
                "prompt": {
                    "other": "API version, e.g. v1beta",
                    "base_url": "Optional Gemini API address"
                },
                "model_group": "Google Gemini",
                "provider_models_list": "Fetch models from Gemini"
            },
            "27": {
                "input": {
                    "models": ["abab6.5-chat", "abab6.5s-chat"],
                    "test_model": "abab6.5s-chat"
                },
                "prompt": {
                    "key": "Format: APISecret|groupID"
                },
                "model_group": "MiniMax"
            },
            "28": {
                "input": {
                    "models": ["deepseek-chat", "deepseek-coder"],
                    "test_model": "deepseek-chat"
                },
                "model_group": "Deepseek",
                "provider_models_list": "Fetch models from Deepseek"
            },
            "29": {
                "input": {
                    "models": ["moonshot-v1-8k", "moonshot-v1-32k", "moonshot-v1-128k"],
                    "test_model": "moonshot-v1-8k"
                },
                "model_group": "Moonshot"
            },
            "31": {
                "input": {
                    "models": ["llama3-8b-8192", "llama3-70b-8192", "mixtral-8x7b-32768"],
                    "test_model": "llama3-8b-8192"
                },
                "model_group": "Groq",
                "provider_models_list": "Fetch models from Groq"
            },
            "32": {
                "input": {
                    "models": ["claude-3-haiku-20240307", "claude-3-5-sonnet-20240620"],
                    "test_model": "claude-3-haiku-20240307"
                },
                "prompt": {
                    "key": "Format: Region|AccessKeyID|SecretAccessKey|SessionToken (session token optional)",
                    "base_url": ""
                },
                "model_group": "Anthropic"
            },
            "35": {
                "input": {
                    "models": ["@cf/meta/llama-3-8b-instruct"],
                    "test_model": "@cf/meta/llama-3-8b-instruct"
                },
                "prompt": {
                    "key": "Format: AccountID|APIToken",
                    "base_url": ""
                },
                "model_group": "Cloudflare AI"
            },
            "39": {
                "label": {
                    "base_url": "Ollama address"
                },
                "prompt": {
                    "base_url": "Address of the Ollama server, e.g. http://127.0.0.1:11434",
                    "key": "Any value; Ollama does not authenticate"
                },
                "input": {
                    "key": "ollama"
                },
                "model_group": "Ollama",
                "provider_models_list": "Fetch models from Ollama"
            },
            "42": {
                "input": {
                    "models": ["gemini-1.5-pro", "claude-3-5-sonnet@20240620"],
                    "test_model": "gemini-1.5-pro"
                },
                "label": {
                    "other": "Region"
                },
                "prompt": {
                    "key": "Format: Region|ProjectID|service account JSON",
                    "other": "Location used for requests, e.g. us-central1",
                    "base_url": ""
                },
                "model_group": "VertexAI"
            }
        },
        "plugins": {
            "1": {
                "online": online_search_plugin()
            },
            "8": {
                "online": online_search_plugin()
            },
            "25": {
                "code_execution": code_execution_plugin(),
                "google_search": {
                    "name": "Google search grounding",
                    "description": "Ground answers with Google search results",
                    "params": {
                        "enable": { "type": "bool", "name": "Enable", "description": "Attach the search tool to every request" }
                    }
                }
            },
            "42": {
                "code_execution": code_execution_plugin()
            }
        }
    })
}

fn online_search_plugin() -> Value {
    json!({
        "name": "Online search",
        "description": "Let the model query a search engine before answering",
        "params": {
            "enable": { "type": "bool", "name": "Enable", "description": "Turn web search on for this channel" },
            "engine": { "type": "string", "name": "Search engine", "description": "Search provider id, e.g. bing" },
            "api_key": { "type": "string", "name": "Search API key", "description": "Credential for the search provider" }
        }
    })
}

fn code_execution_plugin() -> Value {
    json!({
        "name": "Code execution",
        "description": "Allow the model to run code in the provider sandbox",
        "params": {
            "enable": { "type": "bool", "name": "Enable", "description": "Attach the code execution tool to every request" }
        }
    })
}
